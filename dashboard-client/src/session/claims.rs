// dashboard-client/src/session/claims.rs
// JWT payload 本地解码（不校验签名）

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use shared::{TokenClaims, UserInfo};

use crate::error::{ClientError, ClientResult};

/// Decode the payload segment of a JWT.
///
/// The signature is not checked; the server does that on every request.
pub fn decode_claims(token: &str) -> ClientResult<TokenClaims> {
    // JWT 格式: header.payload.signature
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(ClientError::InvalidToken(
            "expected three dot-separated segments".into(),
        ));
    }

    // 有些签发方会保留 '=' 填充
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| ClientError::InvalidToken(format!("payload is not base64url: {e}")))?;
    serde_json::from_slice(&payload)
        .map_err(|e| ClientError::InvalidToken(format!("payload is not valid JSON: {e}")))
}

/// Identity of a token that is still valid at `now` (seconds since epoch)
pub fn validate_claims(claims: &TokenClaims, now: i64) -> ClientResult<UserInfo> {
    let exp = claims
        .exp
        .ok_or_else(|| ClientError::InvalidToken("missing exp claim".into()))?;
    if exp <= now {
        return Err(ClientError::ExpiredToken);
    }
    claims
        .user_info()
        .ok_or_else(|| ClientError::InvalidToken("token carries no identity".into()))
}
