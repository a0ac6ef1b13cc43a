//! Field checks for request bodies. Each check appends its failures to a
//! shared error list so a response reports every bad field at once.

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use super::error::FieldError;

pub const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub fn check_title(errors: &mut Vec<FieldError>, title: Option<&str>, max_len: usize) {
    match title.map(str::trim) {
        None | Some("") => errors.push(FieldError::body("title", "Title is required")),
        Some(t) if t.chars().count() > max_len => errors.push(FieldError::body(
            "title",
            format!("Title must be less than {max_len} characters"),
        )),
        Some(_) => {}
    }
}

/// Like [`check_title`], but an absent title is fine (partial updates).
pub fn check_optional_title(errors: &mut Vec<FieldError>, title: Option<&str>, max_len: usize) {
    if let Some(t) = title.map(str::trim) {
        if t.is_empty() {
            errors.push(FieldError::body("title", "Title cannot be empty"));
        } else if t.chars().count() > max_len {
            errors.push(FieldError::body(
                "title",
                format!("Title must be less than {max_len} characters"),
            ));
        }
    }
}

pub fn check_description(errors: &mut Vec<FieldError>, description: Option<&str>, max_len: usize) {
    if let Some(d) = description
        && d.chars().count() > max_len
    {
        errors.push(FieldError::body(
            "description",
            format!("Description must be less than {max_len} characters"),
        ));
    }
}

pub fn check_priority(errors: &mut Vec<FieldError>, priority: Option<&str>) {
    if let Some(p) = priority
        && !PRIORITIES.contains(&p)
    {
        errors.push(FieldError::body(
            "priority",
            "Priority must be low, medium, or high",
        ));
    }
}

/// An absent or empty value passes; clients clear a due date by sending
/// null or an empty string. Supplied dates must be `YYYY-MM-DD`, parse to
/// a real calendar date, and fall on today or later (local time).
pub fn check_due_date(errors: &mut Vec<FieldError>, due_date: Option<&str>) {
    let Some(value) = due_date else { return };
    if value.is_empty() {
        return;
    }

    if !DATE_RE.is_match(value) {
        errors.push(FieldError::body(
            "dueDate",
            "Due date must be in YYYY-MM-DD format",
        ));
        return;
    }

    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        errors.push(FieldError::body("dueDate", "Due date must be a valid date"));
        return;
    };

    if date < Local::now().date_naive() {
        errors.push(FieldError::body("dueDate", "Due date cannot be in the past"));
    }
}

pub fn check_list_id(errors: &mut Vec<FieldError>, list_id: Option<i32>) {
    if list_id.is_none() {
        errors.push(FieldError::body("listId", "Valid list ID is required"));
    }
}

pub fn check_username(errors: &mut Vec<FieldError>, username: Option<&str>) {
    let trimmed = username.map(str::trim).unwrap_or_default();
    let len = trimmed.chars().count();

    if !(3..=30).contains(&len) {
        errors.push(FieldError::body(
            "username",
            "Username must be between 3 and 30 characters",
        ));
    }
}

pub fn check_email(errors: &mut Vec<FieldError>, email: Option<&str>) {
    let value = email.map(str::trim).unwrap_or_default();

    if !EMAIL_RE.is_match(value) {
        errors.push(FieldError::body("email", "Please provide a valid email"));
    }
}

pub fn check_password(errors: &mut Vec<FieldError>, password: Option<&str>) {
    if password.unwrap_or_default().chars().count() < 6 {
        errors.push(FieldError::body(
            "password",
            "Password must be at least 6 characters",
        ));
    }
}
