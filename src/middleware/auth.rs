use axum::http::{HeaderMap, header};

use crate::auth::{AuthClaims, Authenticator};
use crate::error::{AuthError, BaristaError};

/// Pull the bearer token out of the `Authorization` header.
///
/// The header must be exactly two whitespace-separated parts and the scheme
/// must be the literal `bearer`; the comparison is case-sensitive.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AuthError::missing_header)?;
    let value = raw.to_str().map_err(|_| {
        AuthError::malformed_header("Authorization header is not valid UTF-8.")
    })?;

    let mut parts = value.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => {
            return Err(AuthError::malformed_header(
                "Authorization header must be of the form: bearer <token>.",
            ));
        }
    };
    if scheme != "bearer" {
        return Err(AuthError::malformed_header(
            "Authorization header scheme must be bearer.",
        ));
    }
    Ok(token)
}

/// Per-route authorization guard.
///
/// Called explicitly at the top of each protected handler; on success the
/// handler receives the verified claims. Any failure is terminal for the
/// request.
pub async fn require_permission(
    auth: &Authenticator,
    headers: &HeaderMap,
    permission: &str,
) -> Result<AuthClaims, BaristaError> {
    let token = extract_bearer_token(headers)?;
    let claims = auth.verify(token).await?;
    Authenticator::check_permission(&claims, permission)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorCode;
    use axum::http::{HeaderValue, StatusCode};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn absent_header_is_missing_header() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, AuthErrorCode::MissingHeader);
    }

    #[test]
    fn single_part_is_malformed() {
        let err = extract_bearer_token(&headers_with("bearer")).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::MalformedHeader);
    }

    #[test]
    fn three_parts_is_malformed() {
        let err = extract_bearer_token(&headers_with("bearer abc def")).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::MalformedHeader);
    }

    #[test]
    fn scheme_comparison_is_case_sensitive() {
        let err = extract_bearer_token(&headers_with("Bearer sometoken")).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, AuthErrorCode::MalformedHeader);
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        let err = extract_bearer_token(&headers_with("basic sometoken")).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::MalformedHeader);
    }

    #[test]
    fn well_formed_header_yields_token() {
        let binding = headers_with("bearer abc.def.ghi");
        let token = extract_bearer_token(&binding).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
