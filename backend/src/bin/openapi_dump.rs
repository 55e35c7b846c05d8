//! Print the OpenAPI document as JSON.

use std::io::Write;
use std::process::ExitCode;

use client_card::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => {
            if writeln!(std::io::stdout(), "{json}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(std::io::stderr(), "failed to render OpenAPI document: {error}");
            ExitCode::FAILURE
        }
    }
}
