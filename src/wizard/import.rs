use std::collections::HashMap;

use crate::api::ImportVmFields;

use super::models::FieldError;

const DEFAULT_MIN_DISK_GB: u64 = 20;
const DEFAULT_MIN_RAM_MB: u64 = 2048;

fn first<'a>(form: &'a HashMap<String, Vec<String>>, key: &str) -> &'a str {
    form.get(key).and_then(|vs| vs.first()).map(|s| s.trim()).unwrap_or("")
}

/// Validate the single-form import path. The file itself is checked
/// separately by the handler before any of this matters.
pub fn validate_import(
    form: &HashMap<String, Vec<String>>,
) -> Result<ImportVmFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let vm_name = first(form, "vm_name");
    if vm_name.is_empty() {
        errors.push(FieldError { field: "vm_name", message: "VM name is required".into() });
    }

    let min_disk = match parse_min(first(form, "min_disk"), DEFAULT_MIN_DISK_GB) {
        Ok(v) => v,
        Err(()) => {
            errors.push(FieldError {
                field: "min_disk",
                message: "Minimum disk must be a number of at least 1".into(),
            });
            DEFAULT_MIN_DISK_GB
        }
    };
    let min_ram = match parse_min(first(form, "min_ram"), DEFAULT_MIN_RAM_MB) {
        Ok(v) => v,
        Err(()) => {
            errors.push(FieldError {
                field: "min_ram",
                message: "Minimum RAM must be a number of at least 1".into(),
            });
            DEFAULT_MIN_RAM_MB
        }
    };

    for (field, label) in [
        ("flavor_id", "Please select a flavor"),
        ("network_id", "Please select a network"),
        ("key_name", "Please select a key pair"),
        ("security_group", "Please select a security group"),
    ] {
        if first(form, field).is_empty() {
            errors.push(FieldError { field, message: label.into() });
        }
    }

    let admin_password = first(form, "admin_password");
    if admin_password.chars().count() < 8 {
        errors.push(FieldError {
            field: "admin_password",
            message: "Password must be at least 8 characters".into(),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ImportVmFields {
        vm_name: vm_name.to_string(),
        description: first(form, "description").to_string(),
        min_disk,
        min_ram,
        is_public: matches!(first(form, "is_public"), "on" | "true" | "1"),
        flavor_id: first(form, "flavor_id").to_string(),
        network_id: first(form, "network_id").to_string(),
        key_name: first(form, "key_name").to_string(),
        security_group: first(form, "security_group").to_string(),
        admin_password: admin_password.to_string(),
    })
}

/// Uploads are constrained to VMware disk images.
pub fn validate_vmdk_filename(name: &str) -> Option<FieldError> {
    if name.to_lowercase().ends_with(".vmdk") {
        None
    } else {
        Some(FieldError {
            field: "vmdk_file",
            message: "Invalid file type: only .vmdk files are supported".into(),
        })
    }
}

pub fn missing_file_error() -> FieldError {
    FieldError {
        field: "vmdk_file",
        message: "Please select a VMDK file to import".into(),
    }
}

fn parse_min(raw: &str, default: u64) -> Result<u64, ()> {
    if raw.is_empty() {
        return Ok(default);
    }
    match raw.parse::<u64>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();
        for (k, v) in pairs {
            map.entry(k.to_string()).or_insert_with(Vec::new).push(v.to_string());
        }
        map
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("vm_name", "imported-vm"),
            ("flavor_id", "f1"),
            ("network_id", "n1"),
            ("key_name", "mykey"),
            ("security_group", "default"),
            ("admin_password", "longenough"),
        ]
    }

    #[test]
    fn defaults_fill_optional_sizes() {
        let fields = validate_import(&form(&valid_pairs())).unwrap();
        assert_eq!(fields.min_disk, 20);
        assert_eq!(fields.min_ram, 2048);
        assert!(!fields.is_public);
    }

    #[test]
    fn zero_min_disk_is_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("min_disk", "0"));
        let errors = validate_import(&form(&pairs)).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "min_disk"));
    }

    #[test]
    fn short_password_is_rejected() {
        let pairs: Vec<_> = valid_pairs()
            .into_iter()
            .map(|(k, v)| if k == "admin_password" { (k, "short") } else { (k, v) })
            .collect();
        let errors = validate_import(&form(&pairs)).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "admin_password"));
    }

    #[test]
    fn only_vmdk_files_pass_the_extension_gate() {
        assert!(validate_vmdk_filename("disk.vmdk").is_none());
        assert!(validate_vmdk_filename("DISK.VMDK").is_none());
        assert!(validate_vmdk_filename("disk.qcow2").is_some());
    }
}
