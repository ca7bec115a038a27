//! # Block Registry
//!
//! Static metadata for every block type: palette label, icon and a short
//! description, plus the default props used when a block is created.
//!
//! Lookups never fail. An unknown or corrupted type name resolves to the
//! first registered entry so callers can always draw something.

use crate::{Block, BlockProps, BlockType, IdSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub block_type: BlockType,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl BlockDescriptor {
    /// A fresh copy of the default props for this type
    pub fn default_props(&self) -> BlockProps {
        BlockProps::default_for(self.block_type)
    }
}

static REGISTRY: [BlockDescriptor; 9] = [
    BlockDescriptor {
        block_type: BlockType::Header,
        label: "Header",
        icon: "heading",
        description: "Logo and brand name",
    },
    BlockDescriptor {
        block_type: BlockType::RichText,
        label: "Text",
        icon: "type",
        description: "Formatted paragraph text",
    },
    BlockDescriptor {
        block_type: BlockType::Image,
        label: "Image",
        icon: "image",
        description: "Picture with optional link and caption",
    },
    BlockDescriptor {
        block_type: BlockType::Cta,
        label: "CTA Button",
        icon: "mouse-pointer-click",
        description: "Call-to-action button",
    },
    BlockDescriptor {
        block_type: BlockType::Product,
        label: "Product",
        icon: "shopping-bag",
        description: "Product card with price",
    },
    BlockDescriptor {
        block_type: BlockType::Testimonial,
        label: "Testimonial",
        icon: "quote",
        description: "Customer quote with attribution",
    },
    BlockDescriptor {
        block_type: BlockType::Divider,
        label: "Divider",
        icon: "minus",
        description: "Horizontal separator line",
    },
    BlockDescriptor {
        block_type: BlockType::Spacer,
        label: "Spacer",
        icon: "move-vertical",
        description: "Vertical whitespace",
    },
    BlockDescriptor {
        block_type: BlockType::TwoColumn,
        label: "Two Columns",
        icon: "columns",
        description: "Side-by-side content",
    },
];

/// All entries, in palette order
pub fn all() -> &'static [BlockDescriptor] {
    &REGISTRY
}

pub fn describe_type(block_type: BlockType) -> &'static BlockDescriptor {
    REGISTRY
        .iter()
        .find(|entry| entry.block_type == block_type)
        .unwrap_or(&REGISTRY[0])
}

/// Look up by wire name, falling back to the first entry
pub fn describe(type_name: &str) -> &'static BlockDescriptor {
    match BlockType::parse(type_name) {
        Some(block_type) => describe_type(block_type),
        None => {
            tracing::debug!(block_type = %type_name, "Unknown block type - using fallback descriptor");
            &REGISTRY[0]
        }
    }
}

/// Create a block of the given type with a fresh id and default props
pub fn create(block_type: BlockType, ids: &mut impl IdSource) -> Block {
    Block {
        id: ids.next_id(),
        props: describe_type(block_type).default_props(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialIds;

    #[test]
    fn test_registry_covers_every_type_in_order() {
        let types: Vec<_> = all().iter().map(|d| d.block_type).collect();
        assert_eq!(types, BlockType::ALL.to_vec());
    }

    #[test]
    fn test_describe_known_type() {
        let cta = describe("cta");
        assert_eq!(cta.label, "CTA Button");
        assert_eq!(cta.block_type, BlockType::Cta);
    }

    #[test]
    fn test_describe_unknown_falls_back_to_first() {
        assert_eq!(describe("hologram"), &all()[0]);
        assert_eq!(describe(""), &all()[0]);
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let mut ids = SequentialIds::from_seed("t");
        let a = create(BlockType::Spacer, &mut ids);
        let b = create(BlockType::Spacer, &mut ids);

        assert_ne!(a.id, b.id);
        assert_eq!(a.props, b.props);
        assert_eq!(a.block_type(), Some(BlockType::Spacer));
    }

    #[test]
    fn test_created_props_do_not_alias_registry() {
        let mut ids = SequentialIds::from_seed("t");
        let mut block = create(BlockType::Divider, &mut ids);
        if let BlockProps::Divider(divider) = &mut block.props {
            divider.thickness = 9;
        }

        let fresh = create(BlockType::Divider, &mut ids);
        assert_eq!(fresh.props, describe("divider").default_props());
        assert_ne!(fresh.props, block.props);
    }
}
