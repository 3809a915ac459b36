use anyhow::{Result, bail};

/// Validate a namespace name (RFC 1123 label).
/// Rules: lowercase `[a-z0-9-]`, max 63 chars, no leading/trailing hyphens.
pub fn validate_namespace(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("namespace must not be empty");
    }
    if name.len() > 63 {
        bail!("namespace '{}' exceeds 63 characters (got {})", name, name.len());
    }
    validate_label(name)
}

/// Validate a lease record name (RFC 1123 subdomain).
/// Rules: dot-separated labels of `[a-z0-9-]`, max 253 chars in total.
pub fn validate_lease_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("lease name must not be empty");
    }
    if name.len() > 253 {
        bail!("lease name '{}' exceeds 253 characters (got {})", name, name.len());
    }
    for label in name.split('.') {
        if label.is_empty() {
            bail!("lease name '{}' contains an empty segment", name);
        }
        validate_label(label)?;
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<()> {
    if label.starts_with('-') || label.ends_with('-') {
        bail!("'{}' must not start or end with a hyphen", label);
    }
    if !label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "'{}' must contain only lowercase letters, digits, and hyphens [a-z0-9-]",
            label
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_namespaces() {
        assert!(validate_namespace("node-leases").is_ok());
        assert!(validate_namespace("medik8s-leases").is_ok());
        assert!(validate_namespace("a").is_ok());
    }

    #[test]
    fn invalid_namespaces() {
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("Leases").is_err());
        assert!(validate_namespace("my_ns").is_err());
        assert!(validate_namespace("-leading").is_err());
        assert!(validate_namespace("with.dot").is_err());
        assert!(validate_namespace(&"a".repeat(64)).is_err());
    }

    #[test]
    fn valid_lease_names() {
        assert!(validate_lease_name("node-miau").is_ok());
        assert!(validate_lease_name("node-worker-1.example.com").is_ok());
        assert!(validate_lease_name(&format!("node-{}", "a".repeat(58))).is_ok());
    }

    #[test]
    fn invalid_lease_names() {
        assert!(validate_lease_name("").is_err());
        assert!(validate_lease_name("node-Miau").is_err());
        assert!(validate_lease_name("node-miau.").is_err());
        assert!(validate_lease_name("node..miau").is_err());
        assert!(validate_lease_name("node-miau-").is_err());
        assert!(validate_lease_name(&"a".repeat(254)).is_err());
    }
}
