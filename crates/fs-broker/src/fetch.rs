//! `type = "url"` 写入内容的抓取。
//!
//! `data:` URL 在本地解码，其余 URL 走 HTTP GET。

use base64::{Engine as _, engine::general_purpose::STANDARD};
use percent_encoding::percent_decode_str;

use crate::error::{BrokerError, Result};

/// 抓取数据引用指向的二进制内容。
pub async fn fetch_content(reference: &str) -> Result<Vec<u8>> {
    if let Some(rest) = reference.strip_prefix("data:") {
        return decode_data_url(rest);
    }

    let response = reqwest::get(reference).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// 解码 `data:[<mediatype>][;base64],<data>`。
fn decode_data_url(rest: &str) -> Result<Vec<u8>> {
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| BrokerError::Fetch(format!("malformed data URL: data:{rest}")))?;

    if meta.ends_with(";base64") {
        STANDARD
            .decode(data)
            .map_err(|err| BrokerError::Fetch(format!("invalid base64 payload: {err}")))
    } else {
        Ok(percent_decode_str(data).collect())
    }
}
