//! Pure field validators run at the HTTP boundary before the engine is
//! called. Each function returns the full list of violations so a client sees
//! every bad field at once, not just the first.

use serde::{Deserialize, Serialize};

use crate::{auth::LoginRequest, user::UserNew, wallet};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Minimal email shape check: one `@` with a non-empty local part and a
/// dotted domain. Deliverability is not our problem.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|part| !part.is_empty())
}

/// Checks a decimal amount string: digits, at most two fractional digits,
/// value at least 0.01.
fn check_amount(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new(field, "amount is required"));
        return;
    }

    let (units, fraction) = match trimmed.split_once('.') {
        Some((units, fraction)) => (units, Some(fraction)),
        None => (trimmed, None),
    };

    let digits_only = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(units) || fraction.is_some_and(|f| !digits_only(f)) {
        violations.push(FieldViolation::new(field, "amount must be a decimal number"));
        return;
    }
    if fraction.is_some_and(|f| f.len() > 2) {
        violations.push(FieldViolation::new(
            field,
            "amount supports at most two decimal places",
        ));
        return;
    }

    let all_zero =
        units.chars().all(|c| c == '0') && fraction.is_none_or(|f| f.chars().all(|c| c == '0'));
    if all_zero {
        violations.push(FieldViolation::new(field, "amount must be at least 0.01"));
    }
}

pub fn user_new(payload: &UserNew) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if payload.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "name is required"));
    }
    if !is_email(payload.email.trim()) {
        violations.push(FieldViolation::new("email", "email must be a valid address"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        violations.push(FieldViolation::new(
            "password",
            "password must be at least 8 characters",
        ));
    }
    violations
}

pub fn login(payload: &LoginRequest) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if !is_email(payload.email.trim()) {
        violations.push(FieldViolation::new("email", "email must be a valid address"));
    }
    if payload.password.is_empty() {
        violations.push(FieldViolation::new("password", "password is required"));
    }
    violations
}

pub fn deposit_new(payload: &wallet::DepositNew) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_amount("amount", &payload.amount, &mut violations);
    violations
}

pub fn transfer_new(payload: &wallet::TransferNew) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_amount("amount", &payload.amount, &mut violations);
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit(amount: &str) -> wallet::DepositNew {
        wallet::DepositNew {
            amount: amount.to_string(),
            description: None,
        }
    }

    #[test]
    fn amount_at_minimum_granularity_passes() {
        assert!(deposit_new(&deposit("0.01")).is_empty());
        assert!(deposit_new(&deposit("100.50")).is_empty());
        assert!(deposit_new(&deposit("7")).is_empty());
    }

    #[test]
    fn amount_below_granularity_fails() {
        assert!(!deposit_new(&deposit("0.001")).is_empty());
        assert!(!deposit_new(&deposit("0")).is_empty());
        assert!(!deposit_new(&deposit("0.00")).is_empty());
    }

    #[test]
    fn amount_must_be_a_plain_decimal() {
        assert!(!deposit_new(&deposit("-5")).is_empty());
        assert!(!deposit_new(&deposit("1,50")).is_empty());
        assert!(!deposit_new(&deposit("ten")).is_empty());
        assert!(!deposit_new(&deposit("")).is_empty());
    }

    #[test]
    fn user_new_reports_every_bad_field() {
        let payload = UserNew {
            name: " ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let violations = user_new(&payload);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(is_email("joao.silva@email.com"));
        assert!(!is_email("joao.silva"));
        assert!(!is_email("@email.com"));
        assert!(!is_email("joao@email"));
    }
}
