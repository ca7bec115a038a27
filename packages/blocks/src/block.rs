//! # Block Schema
//!
//! A [`Block`] is one content unit of an email. Its type is carried by the
//! [`BlockProps`] variant, so a block can never hold props of another type
//! and the type cannot change after creation.
//!
//! Every typed props struct decodes with `#[serde(default)]`: keys missing
//! from stored JSON take the values documented on the struct's `Default`
//! impl, which are also the registry defaults for new blocks.

use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque block identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The closed set of block types, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Header,
    RichText,
    Image,
    Cta,
    Product,
    Testimonial,
    Divider,
    Spacer,
    TwoColumn,
}

impl BlockType {
    pub const ALL: [BlockType; 9] = [
        BlockType::Header,
        BlockType::RichText,
        BlockType::Image,
        BlockType::Cta,
        BlockType::Product,
        BlockType::Testimonial,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::TwoColumn,
    ];

    /// Wire name, as stored in the `type` field
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::RichText => "richtext",
            BlockType::Image => "image",
            BlockType::Cta => "cta",
            BlockType::Product => "product",
            BlockType::Testimonial => "testimonial",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::TwoColumn => "twocolumn",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Column split for two-column blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRatio {
    #[default]
    #[serde(rename = "50-50")]
    Even,
    #[serde(rename = "60-40")]
    WideLeft,
    #[serde(rename = "40-60")]
    WideRight,
}

impl ColumnRatio {
    /// Left and right column widths in percent
    pub fn percentages(self) -> (u32, u32) {
        match self {
            ColumnRatio::Even => (50, 50),
            ColumnRatio::WideLeft => (60, 40),
            ColumnRatio::WideRight => (40, 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderProps {
    #[serde(deserialize_with = "lenient::string")]
    pub brand_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub logo_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tagline: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub alignment: Alignment,
    /// Keys this build does not recognise, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeaderProps {
    fn default() -> Self {
        Self {
            brand_name: "Your Brand".to_string(),
            logo_url: String::new(),
            tagline: String::new(),
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
            alignment: Alignment::Center,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RichTextProps {
    /// Serialized rich-text editor output; trusted markup
    #[serde(deserialize_with = "lenient::string")]
    pub html: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient::number")]
    pub font_size: u32,
    #[serde(deserialize_with = "lenient::number")]
    pub padding: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RichTextProps {
    fn default() -> Self {
        Self {
            html: "<p>Start writing your message here.</p>".to_string(),
            text_color: "#374151".to_string(),
            font_size: 16,
            padding: 20,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    #[serde(deserialize_with = "lenient::string")]
    pub src: String,
    #[serde(deserialize_with = "lenient::string")]
    pub alt: String,
    #[serde(deserialize_with = "lenient::string")]
    pub link: String,
    #[serde(deserialize_with = "lenient::string")]
    pub caption: String,
    /// Rendered width in pixels
    #[serde(deserialize_with = "lenient::number")]
    pub width: u32,
    #[serde(deserialize_with = "lenient::number")]
    pub border_radius: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub alignment: Alignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            link: String::new(),
            caption: String::new(),
            width: 600,
            border_radius: 0,
            alignment: Alignment::Center,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaProps {
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient::number")]
    pub border_radius: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub alignment: Alignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CtaProps {
    fn default() -> Self {
        Self {
            text: "Shop Now".to_string(),
            url: "#".to_string(),
            background_color: "#111827".to_string(),
            text_color: "#ffffff".to_string(),
            border_radius: 6,
            alignment: Alignment::Center,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductProps {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub price: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub button_text: String,
    #[serde(deserialize_with = "lenient::string")]
    pub button_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ProductProps {
    fn default() -> Self {
        Self {
            name: "Product name".to_string(),
            price: "$0.00".to_string(),
            description: String::new(),
            image_url: String::new(),
            button_text: "View Product".to_string(),
            button_url: "#".to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialProps {
    #[serde(deserialize_with = "lenient::string")]
    pub quote: String,
    #[serde(deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::string")]
    pub avatar_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background_color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TestimonialProps {
    fn default() -> Self {
        Self {
            quote: "This is the best purchase I have made all year.".to_string(),
            author: "Happy Customer".to_string(),
            role: String::new(),
            avatar_url: String::new(),
            background_color: "#f9fafb".to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerProps {
    #[serde(deserialize_with = "lenient::string")]
    pub color: String,
    /// Line thickness in pixels
    #[serde(deserialize_with = "lenient::number")]
    pub thickness: u32,
    /// Line width in percent of the content column
    #[serde(deserialize_with = "lenient::number")]
    pub width: u32,
    /// Vertical padding above and below, in pixels
    #[serde(deserialize_with = "lenient::number")]
    pub margin: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DividerProps {
    fn default() -> Self {
        Self {
            color: "#e5e7eb".to_string(),
            thickness: 1,
            width: 100,
            margin: 20,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerProps {
    #[serde(deserialize_with = "lenient::number")]
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SpacerProps {
    fn default() -> Self {
        Self {
            height: 32,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwoColumnProps {
    /// Trusted rich-text markup for the left column
    #[serde(deserialize_with = "lenient::string")]
    pub left_html: String,
    /// Trusted rich-text markup for the right column
    #[serde(deserialize_with = "lenient::string")]
    pub right_html: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub ratio: ColumnRatio,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TwoColumnProps {
    fn default() -> Self {
        Self {
            left_html: "<p>Left column content.</p>".to_string(),
            right_html: "<p>Right column content.</p>".to_string(),
            ratio: ColumnRatio::Even,
            extra: Map::new(),
        }
    }
}

/// Typed props, one variant per block type
#[derive(Debug, Clone, PartialEq)]
pub enum BlockProps {
    Header(HeaderProps),
    RichText(RichTextProps),
    Image(ImageProps),
    Cta(CtaProps),
    Product(ProductProps),
    Testimonial(TestimonialProps),
    Divider(DividerProps),
    Spacer(SpacerProps),
    TwoColumn(TwoColumnProps),

    /// A type this build does not know; kept verbatim so saving a document
    /// never drops content written by a newer editor
    Unknown {
        type_name: String,
        props: Map<String, Value>,
    },
}

impl BlockProps {
    /// Registry default props for a type
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Header => BlockProps::Header(HeaderProps::default()),
            BlockType::RichText => BlockProps::RichText(RichTextProps::default()),
            BlockType::Image => BlockProps::Image(ImageProps::default()),
            BlockType::Cta => BlockProps::Cta(CtaProps::default()),
            BlockType::Product => BlockProps::Product(ProductProps::default()),
            BlockType::Testimonial => BlockProps::Testimonial(TestimonialProps::default()),
            BlockType::Divider => BlockProps::Divider(DividerProps::default()),
            BlockType::Spacer => BlockProps::Spacer(SpacerProps::default()),
            BlockType::TwoColumn => BlockProps::TwoColumn(TwoColumnProps::default()),
        }
    }

    /// `None` for unknown types
    pub fn block_type(&self) -> Option<BlockType> {
        Some(match self {
            BlockProps::Header(_) => BlockType::Header,
            BlockProps::RichText(_) => BlockType::RichText,
            BlockProps::Image(_) => BlockType::Image,
            BlockProps::Cta(_) => BlockType::Cta,
            BlockProps::Product(_) => BlockType::Product,
            BlockProps::Testimonial(_) => BlockType::Testimonial,
            BlockProps::Divider(_) => BlockType::Divider,
            BlockProps::Spacer(_) => BlockType::Spacer,
            BlockProps::TwoColumn(_) => BlockType::TwoColumn,
            BlockProps::Unknown { .. } => return None,
        })
    }

    /// Wire name of the type, including unknown ones
    pub fn type_name(&self) -> &str {
        match self {
            BlockProps::Unknown { type_name, .. } => type_name,
            known => known.block_type().map(BlockType::as_str).unwrap_or_default(),
        }
    }

    pub fn same_type(&self, other: &BlockProps) -> bool {
        self.type_name() == other.type_name()
    }

    /// Encode as the open JSON object stored in `props`
    pub fn to_json(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let value = match self {
            BlockProps::Header(p) => serde_json::to_value(p)?,
            BlockProps::RichText(p) => serde_json::to_value(p)?,
            BlockProps::Image(p) => serde_json::to_value(p)?,
            BlockProps::Cta(p) => serde_json::to_value(p)?,
            BlockProps::Product(p) => serde_json::to_value(p)?,
            BlockProps::Testimonial(p) => serde_json::to_value(p)?,
            BlockProps::Divider(p) => serde_json::to_value(p)?,
            BlockProps::Spacer(p) => serde_json::to_value(p)?,
            BlockProps::TwoColumn(p) => serde_json::to_value(p)?,
            BlockProps::Unknown { props, .. } => return Ok(props.clone()),
        };

        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Decode props for a stored type name. A known field with a value that
    /// cannot be decoded is an error; keys the type does not define land in
    /// its `extra` map. Unknown type names always succeed as
    /// [`BlockProps::Unknown`].
    pub fn try_from_json(type_name: &str, props: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let Some(block_type) = BlockType::parse(type_name) else {
            return Ok(BlockProps::Unknown {
                type_name: type_name.to_string(),
                props,
            });
        };

        let value = Value::Object(props);
        Ok(match block_type {
            BlockType::Header => BlockProps::Header(serde_json::from_value(value)?),
            BlockType::RichText => BlockProps::RichText(serde_json::from_value(value)?),
            BlockType::Image => BlockProps::Image(serde_json::from_value(value)?),
            BlockType::Cta => BlockProps::Cta(serde_json::from_value(value)?),
            BlockType::Product => BlockProps::Product(serde_json::from_value(value)?),
            BlockType::Testimonial => BlockProps::Testimonial(serde_json::from_value(value)?),
            BlockType::Divider => BlockProps::Divider(serde_json::from_value(value)?),
            BlockType::Spacer => BlockProps::Spacer(serde_json::from_value(value)?),
            BlockType::TwoColumn => BlockProps::TwoColumn(serde_json::from_value(value)?),
        })
    }

    /// Decode props for a stored type name. Fields whose values cannot be
    /// decoded fall back to the type's default one at a time; the rest of
    /// the stored props are kept.
    pub fn from_json(type_name: &str, props: Map<String, Value>) -> Self {
        let err = match Self::try_from_json(type_name, props.clone()) {
            Ok(decoded) => return decoded,
            Err(err) => err,
        };
        tracing::warn!(block_type = %type_name, error = %err, "Undecodable block props - dropping invalid fields");

        let mut kept = Map::new();
        for (key, value) in props {
            kept.insert(key.clone(), value);
            if let Err(err) = Self::try_from_json(type_name, kept.clone()) {
                tracing::debug!(block_type = %type_name, field = %key, error = %err, "Prop reset to default");
                kept.remove(&key);
            }
        }

        Self::try_from_json(type_name, kept).unwrap_or_else(|_| {
            BlockType::parse(type_name)
                .map(Self::default_for)
                .unwrap_or_else(|| BlockProps::Unknown {
                    type_name: type_name.to_string(),
                    props: Map::new(),
                })
        })
    }
}

/// One content unit of an email document
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub props: BlockProps,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, props: BlockProps) -> Self {
        Self {
            id: id.into(),
            props,
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.props.block_type()
    }

    pub fn type_name(&self) -> &str {
        self.props.type_name()
    }

    /// Same type and props under a different id
    pub fn with_id(&self, id: BlockId) -> Self {
        Self {
            id,
            props: self.props.clone(),
        }
    }
}

/// Wire shape: `{id, type, props}`
#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    props: Value,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let props = self.props.to_json().map_err(serde::ser::Error::custom)?;
        RawBlock {
            id: self.id.clone(),
            type_name: self.type_name().to_string(),
            props: Value::Object(props),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBlock::deserialize(deserializer)?;
        let props = match raw.props {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Block {
            id: raw.id,
            props: BlockProps::from_json(&raw.type_name, props),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_type_wire_names() {
        for ty in BlockType::ALL {
            assert_eq!(BlockType::parse(ty.as_str()), Some(ty));
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
        assert_eq!(BlockType::parse("carousel"), None);
    }

    #[test]
    fn test_missing_props_use_defaults() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "cta",
            "props": { "text": "Buy" }
        }))
        .unwrap();

        let BlockProps::Cta(cta) = &block.props else {
            panic!("expected cta props");
        };
        assert_eq!(cta.text, "Buy");
        assert_eq!(cta.border_radius, 6);
        assert_eq!(cta.alignment, Alignment::Center);
    }

    #[test]
    fn test_lenient_numbers_and_strings() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "image",
            "props": { "width": "480", "borderRadius": "8px" }
        }))
        .unwrap();
        let BlockProps::Image(image) = &block.props else {
            panic!("expected image props");
        };
        assert_eq!(image.width, 480);
        assert_eq!(image.border_radius, 8);

        let block: Block = serde_json::from_value(json!({
            "id": "b2",
            "type": "product",
            "props": { "price": 19.5 }
        }))
        .unwrap();
        let BlockProps::Product(product) = &block.props else {
            panic!("expected product props");
        };
        assert_eq!(product.price, "19.5");
    }

    #[test]
    fn test_unknown_alignment_falls_back() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "header",
            "props": { "alignment": "diagonal", "brandName": "Acme" }
        }))
        .unwrap();
        let BlockProps::Header(header) = &block.props else {
            panic!("expected header props");
        };
        assert_eq!(header.alignment, Alignment::Center);
        assert_eq!(header.brand_name, "Acme");
    }

    #[test]
    fn test_garbage_number_falls_back_to_defaults() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "spacer",
            "props": { "height": "tall" }
        }))
        .unwrap();
        assert_eq!(block.props, BlockProps::Spacer(SpacerProps::default()));
    }

    #[test]
    fn test_invalid_field_keeps_the_rest() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "richtext",
            "props": { "html": "<p>keep me</p>", "fontSize": -3, "padding": "12px" }
        }))
        .unwrap();

        let BlockProps::RichText(text) = &block.props else {
            panic!("expected rich text props");
        };
        assert_eq!(text.html, "<p>keep me</p>");
        assert_eq!(text.font_size, 16);
        assert_eq!(text.padding, 12);
        assert!(text.extra.is_empty());
    }

    #[test]
    fn test_unrecognised_keys_survive_resave() {
        let value = json!({
            "id": "b1",
            "type": "header",
            "props": {
                "brandName": "Acme",
                "logoUrl": "",
                "tagline": "",
                "backgroundColor": "#ffffff",
                "textColor": "#111827",
                "alignment": "left",
                "fontFamily": "Georgia",
                "shadow": { "blur": 4 }
            }
        });
        let block: Block = serde_json::from_value(value.clone()).unwrap();

        let BlockProps::Header(header) = &block.props else {
            panic!("expected header props");
        };
        assert_eq!(header.alignment, Alignment::Left);
        assert_eq!(header.extra["fontFamily"], "Georgia");
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_unrecognised_keys_survive_field_fallback() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "spacer",
            "props": { "height": "tall", "mobileHeight": 8 }
        }))
        .unwrap();

        let BlockProps::Spacer(spacer) = &block.props else {
            panic!("expected spacer props");
        };
        assert_eq!(spacer.height, 32);
        assert_eq!(spacer.extra["mobileHeight"], 8);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let value = json!({
            "id": "b9",
            "type": "countdown",
            "props": { "endsAt": "2026-12-01", "style": { "nested": true } }
        });
        let block: Block = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(block.block_type(), None);
        assert_eq!(block.type_name(), "countdown");
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_column_ratio_wire_format() {
        let props = TwoColumnProps {
            ratio: ColumnRatio::WideLeft,
            ..Default::default()
        };
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["ratio"], "60-40");
        assert_eq!(ColumnRatio::WideRight.percentages(), (40, 60));
    }

    #[test]
    fn test_default_props_are_independent_copies() {
        let mut a = BlockProps::default_for(BlockType::Header);
        let b = BlockProps::default_for(BlockType::Header);
        if let BlockProps::Header(header) = &mut a {
            header.brand_name = "Changed".to_string();
        }
        assert_ne!(a, b);
        assert_eq!(b, BlockProps::Header(HeaderProps::default()));
    }
}
