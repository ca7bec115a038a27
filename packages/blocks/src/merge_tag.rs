use crate::markup::{escape_html, MERGE_TAG_ATTR};
use serde::{Deserialize, Serialize};

/// A recipient-data placeholder resolved by the mail sender at send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTag {
    /// Tag id, e.g. `first_name`
    pub id: String,
    /// Human label shown in the palette, e.g. "First Name"
    pub label: String,
    /// Literal text emitted into compiled HTML, e.g. `{{first_name}}`
    pub placeholder: String,
    #[serde(default)]
    pub description: String,
}

impl MergeTag {
    /// Tag whose placeholder is `{{id}}`
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            placeholder: format!("{{{{{}}}}}", id),
            id,
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pill markup embedded in rich-text HTML. The compiler strips the
    /// wrapper and keeps only the placeholder.
    pub fn pill_html(&self) -> String {
        format!(
            "<span {}=\"{}\" class=\"merge-tag\">{}</span>",
            MERGE_TAG_ATTR,
            escape_html(&self.id),
            escape_html(&self.placeholder)
        )
    }
}

/// Tags every workspace has
pub fn default_merge_tags() -> Vec<MergeTag> {
    vec![
        MergeTag::new("first_name", "First Name").with_description("Subscriber's first name"),
        MergeTag::new("last_name", "Last Name").with_description("Subscriber's last name"),
        MergeTag::new("email", "Email Address").with_description("Subscriber's email address"),
        MergeTag::new("company", "Company").with_description("Subscriber's company"),
        MergeTag::new("shop_name", "Shop Name").with_description("Your store's name"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_from_id() {
        let tag = MergeTag::new("first_name", "First Name");
        assert_eq!(tag.placeholder, "{{first_name}}");
    }

    #[test]
    fn test_pill_html() {
        let tag = MergeTag::new("email", "Email Address");
        assert_eq!(
            tag.pill_html(),
            r#"<span data-merge-tag="email" class="merge-tag">{{email}}</span>"#
        );
    }

    #[test]
    fn test_default_tags_have_unique_ids() {
        let tags = default_merge_tags();
        let mut ids: Vec<_> = tags.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tags.len());
    }
}
