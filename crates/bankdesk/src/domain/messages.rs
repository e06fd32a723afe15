//! User-facing status strings

pub const CHECK_FAILED: &str = "An error occurred while checking the account.";
pub const CREATE_DECLINED: &str = "Please create an account first.";
pub const ACCOUNT_CREATED: &str = "Account created successfully.";
pub const CREATE_FAILED: &str = "An error occurred while creating the account.";
pub const AMOUNT_REQUIRED: &str = "Please enter an amount.";
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Question shown before creating a missing account
pub const CREATE_PROMPT: &str = "Account does not exist. Would you like to create a new account?";
