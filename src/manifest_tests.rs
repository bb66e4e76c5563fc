// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `manifest.rs`

#[cfg(test)]
mod tests {
    use crate::manifest::*;

    const BUILD_CONFIG: &str = r"
apiVersion: build.openshift.io/v1
kind: BuildConfig
metadata:
  name: subscription-content-rhel8
spec:
  runPolicy: Serial
";

    #[test]
    fn test_parse_fills_missing_namespace() {
        let manifest = Manifest::parse(BUILD_CONFIG, "e2e-test").unwrap();

        assert_eq!(manifest.api_version, "build.openshift.io/v1");
        assert_eq!(manifest.kind, "BuildConfig");
        assert_eq!(manifest.name, "subscription-content-rhel8");
        assert_eq!(manifest.namespace, "e2e-test");
        assert_eq!(
            manifest.object.pointer("/metadata/namespace").and_then(|v| v.as_str()),
            Some("e2e-test")
        );
        assert_eq!(
            manifest.object.pointer("/spec/runPolicy").and_then(|v| v.as_str()),
            Some("Serial")
        );
    }

    #[test]
    fn test_parse_accepts_matching_namespace() {
        let yaml = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n  namespace: e2e\n";
        let manifest = Manifest::parse(yaml, "e2e").unwrap();
        assert_eq!(manifest.namespace, "e2e");
    }

    #[test]
    fn test_parse_rejects_foreign_namespace() {
        let yaml = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n  namespace: other\n";
        let err = Manifest::parse(yaml, "e2e").unwrap_err();
        assert!(err.to_string().contains("targets namespace other"));
    }

    #[test]
    fn test_parse_requires_identity_fields() {
        let missing_kind = "apiVersion: v1\nmetadata:\n  name: s\n";
        assert_eq!(
            Manifest::parse(missing_kind, "e2e").unwrap_err().to_string(),
            "missing kind"
        );

        let missing_name = "apiVersion: v1\nkind: Secret\nmetadata: {}\n";
        assert_eq!(
            Manifest::parse(missing_name, "e2e").unwrap_err().to_string(),
            "missing metadata.name"
        );
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(Manifest::parse("- a\n- b\n", "e2e").is_err());
        assert!(Manifest::parse("kind: [unclosed", "e2e").is_err());
    }

    #[test]
    fn test_api_resource_for_build_config() {
        let ar = Manifest::parse(BUILD_CONFIG, "e2e").unwrap().api_resource();
        assert_eq!(ar.group, "build.openshift.io");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.api_version, "build.openshift.io/v1");
        assert_eq!(ar.plural, "buildconfigs");
    }

    #[test]
    fn test_split_api_version() {
        assert_eq!(split_api_version("v1"), ("", "v1"));
        assert_eq!(
            split_api_version("image.openshift.io/v1"),
            ("image.openshift.io", "v1")
        );
    }

    #[test]
    fn test_pluralize_kind() {
        assert_eq!(pluralize_kind("ImageStream"), "imagestreams");
        assert_eq!(pluralize_kind("BuildConfig"), "buildconfigs");
        assert_eq!(pluralize_kind("Secret"), "secrets");
        assert_eq!(pluralize_kind("Ingress"), "ingresses");
        assert_eq!(pluralize_kind("NetworkPolicy"), "networkpolicies");
        assert_eq!(pluralize_kind("Gateway"), "gateways");
    }
}
