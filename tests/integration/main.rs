//! Integration tests for security-validator

mod hook_tests;
