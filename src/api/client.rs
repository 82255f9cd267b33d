//! HTTP client for logs.tf: the match metadata API, raw log archives
//! and the homepage (for discovering the newest log id).

use super::types::ApiResponse;
use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, LOGS_TF_URL};
use crate::utils::error::ApiError;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;

/// Build the shared blocking client.
pub fn http_client() -> Result<Client, ApiError> {
    let client = Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .map_err(ApiError::RequestFailed)?;
    Ok(client)
}

/// Fetch the API metadata document for one log.
pub fn fetch_api(client: &Client, log_id: i64) -> Result<ApiResponse, ApiError> {
    let url = format!("{}/api/v1/log/{}", LOGS_TF_URL, log_id);
    debug!("Fetching api response: {}", url);
    let response = client.get(&url).send()?;
    check_status(response.status())?;
    let api: ApiResponse = response.json()?;
    if !api.success {
        return Err(ApiError::Unsuccessful(log_id));
    }
    Ok(api)
}

/// Fetch the API metadata document and persist it at `save_path`.
pub fn fetch_api_file(client: &Client, log_id: i64, save_path: &Path) -> Result<(), ApiError> {
    let api = fetch_api(client, log_id)?;
    ensure_parent(save_path)?;
    fs::write(save_path, serde_json::to_vec(&api)?)?;
    Ok(())
}

/// Download the zipped raw log for one log id to `save_path`.
pub fn fetch_log_file(client: &Client, log_id: i64, save_path: &Path) -> Result<(), ApiError> {
    let url = format!("{}/logs/log_{}.log.zip", LOGS_TF_URL, log_id);
    info!("Fetching log: {}", url);
    let response = client.get(&url).send()?;
    check_status(response.status())?;
    let body = response.bytes()?;
    ensure_parent(save_path)?;
    fs::write(save_path, &body)?;
    Ok(())
}

/// Scrape the newest log id from the homepage listing.
pub fn latest_log_id(client: &Client) -> Result<i64, ApiError> {
    let body = client.get(LOGS_TF_URL).send()?.text()?;
    Ok(parse_latest_log_id(&body))
}

/// Largest id among the `<tr id="log_N">` rows of the homepage.
pub(crate) fn parse_latest_log_id(body: &str) -> i64 {
    // Literal pattern, cannot fail to compile
    let rx = Regex::new(r#"<tr id="log_(\d+)">"#).expect("invalid log id pattern");
    let mut largest = 0i64;
    for caps in rx.captures_iter(body).take(25) {
        match caps[1].parse::<i64>() {
            Ok(log_id) => largest = largest.max(log_id),
            Err(_) => warn!("Failed to parse logid: {}", &caps[1]),
        }
    }
    largest
}

pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        404 => Err(ApiError::NotFound),
        429 => Err(ApiError::TooManyRequests),
        code => Err(ApiError::BadStatus(code)),
    }
}

pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_log_id() {
        let body = r#"
            <table>
            <tr id="log_2428301"><td>koth_product_rcx</td></tr>
            <tr id="log_2428299"><td>cp_snakewater_final1</td></tr>
            <tr id="log_2428300"><td>cp_process_f7</td></tr>
            </table>
        "#;
        assert_eq!(parse_latest_log_id(body), 2428301);
    }

    #[test]
    fn test_parse_latest_log_id_empty_page() {
        assert_eq!(parse_latest_log_id("<html></html>"), 0);
    }

    #[test]
    fn test_check_status_mapping() {
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(reqwest::StatusCode::NOT_FOUND),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            check_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            Err(ApiError::TooManyRequests)
        ));
        assert!(matches!(
            check_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            Err(ApiError::BadStatus(500))
        ));
    }
}
