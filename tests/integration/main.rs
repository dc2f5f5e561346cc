//! Integration tests driving the DocVault HTTP API end to end.

mod activity_test;
mod file_test;
mod folder_test;
mod helpers;
