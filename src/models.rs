//! The fixed table of supported VLM models.
//!
//! Model selection is a closed enumeration on purpose: each entry names a
//! provider/model pair that has been exercised against real documents, and
//! the CLI help can list exactly what works. Anything else — including the
//! literal `"default"` sentinel — selects the standard pdfium text
//! pipeline, so an unknown name degrades gracefully instead of erroring.

/// The sentinel model name selecting the standard (non-VLM) pipeline.
pub const DEFAULT_MODEL: &str = "default";

/// A resolved entry of the model table: a friendly name mapped to the
/// provider id and model id understood by the provider factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlmModelSpec {
    /// Friendly name accepted by `--model`.
    pub name: &'static str,
    /// Provider id passed to the provider factory (`openai`, `anthropic`, …).
    pub provider: &'static str,
    /// Model id passed to the provider.
    pub model_id: &'static str,
}

/// The fixed name→spec table.
pub const VLM_MODELS: &[VlmModelSpec] = &[
    VlmModelSpec {
        name: "gpt-4.1-nano",
        provider: "openai",
        model_id: "gpt-4.1-nano",
    },
    VlmModelSpec {
        name: "gpt-4.1-mini",
        provider: "openai",
        model_id: "gpt-4.1-mini",
    },
    VlmModelSpec {
        name: "claude-sonnet",
        provider: "anthropic",
        model_id: "claude-sonnet-4-20250514",
    },
    VlmModelSpec {
        name: "gemini-flash",
        provider: "gemini",
        model_id: "gemini-2.0-flash",
    },
    VlmModelSpec {
        name: "pixtral",
        provider: "mistral",
        model_id: "pixtral-12b-2409",
    },
];

/// Resolve a `--model` value against the table.
///
/// Returns `None` for `"default"` and for any name not in the table, which
/// callers treat as "use the standard pipeline".
pub fn resolve_model(name: &str) -> Option<&'static VlmModelSpec> {
    if name == DEFAULT_MODEL {
        return None;
    }
    VLM_MODELS.iter().find(|spec| spec.name == name)
}

/// Comma-separated list of accepted model names, for CLI help text.
pub fn model_names() -> String {
    let mut names = vec![DEFAULT_MODEL];
    names.extend(VLM_MODELS.iter().map(|s| s.name));
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_standard_pipeline() {
        assert!(resolve_model("default").is_none());
    }

    #[test]
    fn unknown_name_selects_standard_pipeline() {
        assert!(resolve_model("granite-docling").is_none());
        assert!(resolve_model("").is_none());
    }

    #[test]
    fn table_names_resolve() {
        let spec = resolve_model("claude-sonnet").expect("claude-sonnet is in the table");
        assert_eq!(spec.provider, "anthropic");
        assert_eq!(spec.model_id, "claude-sonnet-4-20250514");

        let spec = resolve_model("pixtral").expect("pixtral is in the table");
        assert_eq!(spec.provider, "mistral");
    }

    #[test]
    fn table_names_are_unique() {
        for (i, a) in VLM_MODELS.iter().enumerate() {
            for b in &VLM_MODELS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
            assert_ne!(a.name, DEFAULT_MODEL);
        }
    }

    #[test]
    fn model_names_lists_default_first() {
        let names = model_names();
        assert!(names.starts_with("default"));
        assert!(names.contains("gemini-flash"));
    }
}
