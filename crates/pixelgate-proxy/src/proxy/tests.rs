//! Tests for the proxy module.
//!
//! Cross-module tests for the admission pipeline pieces.

#[cfg(test)]
mod target_pipeline_tests {
    use crate::config::{AllowlistConfig, OriginConfig};
    use crate::proxy::resolve_target;

    #[test]
    fn test_custom_download_template() {
        let origin = OriginConfig {
            download_template: "https://pixeldrain.com/api/v2/files/{id}/raw".to_string(),
            ..Default::default()
        };
        let target = resolve_target(Some("id=f00"), &origin, &AllowlistConfig::default()).unwrap();
        assert_eq!(target.uri.path(), "/api/v2/files/f00/raw");
    }

    #[test]
    fn test_custom_domain_allowlist() {
        let allowlist = AllowlistConfig {
            domains: vec!["files.internal".to_string()],
            ..Default::default()
        };

        let target = resolve_target(
            Some("origin=http://files.internal/blob/1"),
            &OriginConfig::default(),
            &allowlist,
        )
        .unwrap();
        assert_eq!(target.host, "files.internal");

        // Default domains are no longer on the list
        let err = resolve_target(
            Some("origin=https://pixeldrain.com/api/file/abc"),
            &OriginConfig::default(),
            &allowlist,
        )
        .unwrap_err();
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn test_allowlist_checked_for_id_targets_too() {
        // A template pointing off-allowlist must still be denied
        let origin = OriginConfig {
            download_template: "https://elsewhere.example/file/{id}".to_string(),
            ..Default::default()
        };
        let err = resolve_target(Some("id=abc"), &origin, &AllowlistConfig::default()).unwrap_err();
        assert_eq!(err.status(), 403);
    }
}

#[cfg(test)]
mod denial_message_tests {
    use crate::geofence::DenyReason;

    #[test]
    fn test_stable_literals() {
        assert_eq!(DenyReason::NoClientIp.message(), "No IP detected");
        assert_eq!(
            DenyReason::LookupFailed.message(),
            "Access denied from your network"
        );
        assert_eq!(
            DenyReason::AsnNotPermitted.message(),
            "Access denied from your network"
        );
    }
}
