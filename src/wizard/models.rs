use std::collections::HashMap;

use thiserror::Error;

use crate::api::VmCreateRequest;

/// The five wizard positions, strictly linear. `Summary` is the only step
/// without its own form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    Flavor,
    Image,
    Network,
    Details,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Flavor,
        WizardStep::Image,
        WizardStep::Network,
        WizardStep::Details,
        WizardStep::Summary,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            WizardStep::Flavor => "flavor",
            WizardStep::Image => "image",
            WizardStep::Network => "network",
            WizardStep::Details => "details",
            WizardStep::Summary => "summary",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Flavor => "Flavor & Resources",
            WizardStep::Image => "Operating System",
            WizardStep::Network => "Network & Security",
            WizardStep::Details => "VM Details",
            WizardStep::Summary => "Summary",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Validated values for exactly one input step. Advancing a step produces
/// one of these; nothing else ever mutates the draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepValues {
    Flavor {
        flavor_id: String,
    },
    Image {
        image_id: String,
    },
    Network {
        network_id: String,
        key_name: String,
        security_group: String,
    },
    Details {
        name: String,
        admin_username: String,
        admin_password: String,
    },
}

/// The accumulator assembled across the wizard. Lives in the server-side
/// per-session store between requests, never in URLs or markup; only
/// complete drafts become a create request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmDraft {
    pub flavor_id: Option<String>,
    pub image_id: Option<String>,
    pub network_id: Option<String>,
    pub key_name: Option<String>,
    pub security_group: Option<String>,
    pub name: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("draft is missing {field}")]
pub struct IncompleteDraft {
    pub field: &'static str,
}

impl VmDraft {
    /// Pure reducer: merge one step's validated values into the draft.
    pub fn apply(mut self, values: StepValues) -> Self {
        match values {
            StepValues::Flavor { flavor_id } => {
                self.flavor_id = Some(flavor_id);
            }
            StepValues::Image { image_id } => {
                self.image_id = Some(image_id);
            }
            StepValues::Network { network_id, key_name, security_group } => {
                self.network_id = Some(network_id);
                self.key_name = Some(key_name);
                self.security_group = Some(security_group);
            }
            StepValues::Details { name, admin_username, admin_password } => {
                self.name = Some(name);
                self.admin_username = Some(admin_username);
                self.admin_password = Some(admin_password);
            }
        }
        self
    }

    /// A draft is submittable only once every input step has contributed.
    pub fn into_request(self) -> Result<VmCreateRequest, IncompleteDraft> {
        fn take(v: Option<String>, field: &'static str) -> Result<String, IncompleteDraft> {
            v.filter(|s| !s.is_empty()).ok_or(IncompleteDraft { field })
        }
        Ok(VmCreateRequest {
            flavor_id: take(self.flavor_id, "flavor_id")?,
            image_id: take(self.image_id, "image_id")?,
            network_id: take(self.network_id, "network_id")?,
            key_name: take(self.key_name, "key_name")?,
            security_group: take(self.security_group, "security_group")?,
            name: take(self.name, "name")?,
            admin_username: take(self.admin_username, "admin_username")?,
            admin_password: take(self.admin_password, "admin_password")?,
        })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        let v = match field {
            "flavor_id" => &self.flavor_id,
            "image_id" => &self.image_id,
            "network_id" => &self.network_id,
            "key_name" => &self.key_name,
            "security_group" => &self.security_group,
            "name" => &self.name,
            "admin_username" => &self.admin_username,
            "admin_password" => &self.admin_password,
            _ => return None,
        };
        v.as_deref()
    }

    fn set(&mut self, field: &str, value: String) {
        match field {
            "flavor_id" => self.flavor_id = Some(value),
            "image_id" => self.image_id = Some(value),
            "network_id" => self.network_id = Some(value),
            "key_name" => self.key_name = Some(value),
            "security_group" => self.security_group = Some(value),
            "name" => self.name = Some(value),
            "admin_username" => self.admin_username = Some(value),
            "admin_password" => self.admin_password = Some(value),
            _ => {}
        }
    }

    /// Echo one step's posted values onto a copy of the draft so a failed
    /// validation re-renders what the operator typed. Display only; the
    /// stored draft never sees unvalidated input.
    pub fn overlay(mut self, step: WizardStep, form: &HashMap<String, Vec<String>>) -> Self {
        for field in step_fields(step) {
            if let Some(v) = form.get(*field).and_then(|vs| vs.first()) {
                self.set(field, v.trim().to_string());
            }
        }
        self
    }
}

fn step_fields(step: WizardStep) -> &'static [&'static str] {
    match step {
        WizardStep::Flavor => &["flavor_id"],
        WizardStep::Image => &["image_id"],
        WizardStep::Network => &["network_id", "key_name", "security_group"],
        WizardStep::Details => &["name", "admin_username", "admin_password"],
        WizardStep::Summary => &[],
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self { field, message: message.to_string() }
    }
}

pub fn error_for(errors: &[FieldError], field: &str) -> Option<String> {
    errors.iter().find(|e| e.field == field).map(|e| e.message.clone())
}

fn first<'a>(form: &'a HashMap<String, Vec<String>>, key: &str) -> &'a str {
    form.get(key).and_then(|vs| vs.first()).map(|s| s.trim()).unwrap_or("")
}

/// Validate exactly one step's fields against the posted form. Declarative
/// per-field constraints, evaluated synchronously; other steps' values are
/// never consulted.
pub fn validate_step(
    step: WizardStep,
    form: &HashMap<String, Vec<String>>,
) -> Result<StepValues, Vec<FieldError>> {
    match step {
        WizardStep::Flavor => {
            let flavor_id = first(form, "flavor_id");
            if flavor_id.is_empty() {
                return Err(vec![FieldError::new("flavor_id", "Please select a flavor")]);
            }
            Ok(StepValues::Flavor { flavor_id: flavor_id.to_string() })
        }
        WizardStep::Image => {
            let image_id = first(form, "image_id");
            if image_id.is_empty() {
                return Err(vec![FieldError::new("image_id", "Please select an image")]);
            }
            Ok(StepValues::Image { image_id: image_id.to_string() })
        }
        WizardStep::Network => {
            let network_id = first(form, "network_id");
            let key_name = first(form, "key_name");
            let security_group = first(form, "security_group");
            let mut errors = Vec::new();
            if network_id.is_empty() {
                errors.push(FieldError::new("network_id", "Please select a network"));
            }
            if key_name.is_empty() {
                errors.push(FieldError::new("key_name", "Please select a key pair"));
            }
            if security_group.is_empty() {
                errors.push(FieldError::new("security_group", "Please select a security group"));
            }
            if !errors.is_empty() {
                return Err(errors);
            }
            Ok(StepValues::Network {
                network_id: network_id.to_string(),
                key_name: key_name.to_string(),
                security_group: security_group.to_string(),
            })
        }
        WizardStep::Details => {
            let name = first(form, "name");
            let admin_username = first(form, "admin_username");
            let admin_password = first(form, "admin_password");
            let mut errors = Vec::new();
            if name.is_empty() {
                errors.push(FieldError::new("name", "VM name is required"));
            } else if name.chars().count() > 50 {
                errors.push(FieldError::new("name", "Name too long (max 50 characters)"));
            }
            if admin_username.is_empty() {
                errors.push(FieldError::new("admin_username", "Admin username is required"));
            } else if admin_username.chars().count() > 30 {
                errors.push(FieldError::new("admin_username", "Username too long (max 30 characters)"));
            }
            if admin_password.chars().count() < 8 {
                errors.push(FieldError::new(
                    "admin_password",
                    "Password must be at least 8 characters",
                ));
            } else if admin_password.chars().count() > 50 {
                errors.push(FieldError::new("admin_password", "Password too long (max 50 characters)"));
            }
            if !errors.is_empty() {
                return Err(errors);
            }
            Ok(StepValues::Details {
                name: name.to_string(),
                admin_username: admin_username.to_string(),
                admin_password: admin_password.to_string(),
            })
        }
        // Summary has no form of its own; submission goes through
        // VmDraft::into_request instead, so posted values are refused.
        WizardStep::Summary => Err(Vec::new()),
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

    fn full_draft() -> VmDraft {
        VmDraft::default()
            .apply(StepValues::Flavor { flavor_id: "f1".into() })
            .apply(StepValues::Image { image_id: "i1".into() })
            .apply(StepValues::Network {
                network_id: "n1".into(),
                key_name: "mykey".into(),
                security_group: "default".into(),
            })
            .apply(StepValues::Details {
                name: "web-1".into(),
                admin_username: "ubuntu".into(),
                admin_password: "hunter2hunter2".into(),
            })
    }

    #[test]
    fn steps_are_strictly_linear() {
        assert_eq!(WizardStep::Flavor.next(), Some(WizardStep::Image));
        assert_eq!(WizardStep::Image.next(), Some(WizardStep::Network));
        assert_eq!(WizardStep::Network.next(), Some(WizardStep::Details));
        assert_eq!(WizardStep::Details.next(), Some(WizardStep::Summary));
        assert_eq!(WizardStep::Summary.next(), None);
        assert_eq!(WizardStep::Flavor.prev(), None);
        assert_eq!(WizardStep::Summary.prev(), Some(WizardStep::Details));
    }

    #[test]
    fn slugs_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_slug(step.slug()), Some(step));
        }
        assert_eq!(WizardStep::from_slug("nope"), None);
    }

    #[test]
    fn invalid_step_leaves_other_fields_untouched() {
        // A failed details validation must not change a draft built earlier.
        let draft = VmDraft::default().apply(StepValues::Flavor { flavor_id: "f1".into() });
        let before = draft.clone();
        let result = validate_step(WizardStep::Details, &form(&[("name", "web"), ("admin_password", "short")]));
        assert!(result.is_err());
        assert_eq!(draft, before);
    }

    #[test]
    fn details_validation_reports_each_field() {
        let errors = validate_step(WizardStep::Details, &form(&[])).unwrap_err();
        assert!(error_for(&errors, "name").is_some());
        assert!(error_for(&errors, "admin_username").is_some());
        assert!(error_for(&errors, "admin_password").is_some());
    }

    #[test]
    fn details_rejects_name_over_50_chars() {
        let long = "x".repeat(51);
        let errors = validate_step(
            WizardStep::Details,
            &form(&[("name", &long), ("admin_username", "root"), ("admin_password", "longenough")]),
        )
        .unwrap_err();
        assert!(error_for(&errors, "name").unwrap().contains("too long"));
    }

    #[test]
    fn network_requires_all_three_selections() {
        let errors =
            validate_step(WizardStep::Network, &form(&[("network_id", "n1")])).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(error_for(&errors, "key_name").is_some());
        assert!(error_for(&errors, "security_group").is_some());
    }

    #[test]
    fn complete_draft_becomes_request_with_union_of_steps() {
        let req = full_draft().into_request().expect("draft is complete");
        assert_eq!(req.flavor_id, "f1");
        assert_eq!(req.image_id, "i1");
        assert_eq!(req.network_id, "n1");
        assert_eq!(req.key_name, "mykey");
        assert_eq!(req.security_group, "default");
        assert_eq!(req.name, "web-1");
        assert_eq!(req.admin_username, "ubuntu");
        assert_eq!(req.admin_password, "hunter2hunter2");
    }

    #[test]
    fn partial_draft_is_not_submittable() {
        let draft = VmDraft::default()
            .apply(StepValues::Flavor { flavor_id: "f1".into() })
            .apply(StepValues::Image { image_id: "i1".into() });
        let err = draft.into_request().unwrap_err();
        assert_eq!(err.field, "network_id");
    }

    #[test]
    fn overlay_echoes_only_the_steps_own_fields() {
        let draft = full_draft();
        let echoed = draft.clone().overlay(
            WizardStep::Details,
            &form(&[("name", "other"), ("admin_password", "short"), ("flavor_id", "f9")]),
        );
        assert_eq!(echoed.name.as_deref(), Some("other"));
        assert_eq!(echoed.admin_password.as_deref(), Some("short"));
        // Fields owned by other steps are never echoed.
        assert_eq!(echoed.flavor_id, draft.flavor_id);
    }

    #[test]
    fn summary_step_refuses_posted_values() {
        // A crafted POST to the summary slug must not produce values that
        // could clobber the draft.
        let result = validate_step(WizardStep::Summary, &form(&[("flavor_id", "")]));
        assert!(result.is_err());
    }

    #[test]
    fn retry_after_failure_submits_identical_payload() {
        // The draft survives a failed create untouched, so a second submit
        // builds the same request.
        let draft = full_draft();
        assert_eq!(
            draft.clone().into_request().unwrap(),
            draft.into_request().unwrap()
        );
    }
}
