//! Product Info Lookup
//!
//! Case-insensitive substring match against a small static catalog. The
//! identifier may be an extracted product name or, when extraction failed,
//! the raw query text, so matching works in both directions (catalog key
//! inside the query, or the query inside the key).

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub name: &'static str,
    pub price: &'static str,
    pub availability: &'static str,
    pub description: &'static str,
}

/// Static product catalog
pub const CATALOG: &[Product] = &[
    Product {
        name: "Laptop Pro 15",
        price: "$1,299.00",
        availability: "In Stock",
        description: "15-inch ultrabook with 16GB RAM and a 512GB SSD.",
    },
    Product {
        name: "Wireless Mouse M2",
        price: "$49.00",
        availability: "In Stock",
        description: "Silent-click wireless mouse with a 6-month battery life.",
    },
    Product {
        name: "Monitor X",
        price: "$349.00",
        availability: "Low Stock",
        description: "27-inch 4K monitor with USB-C power delivery.",
    },
    Product {
        name: "USB-C Dock Station",
        price: "$129.00",
        availability: "Out of Stock",
        description: "11-in-1 docking station with dual HDMI output.",
    },
    Product {
        name: "Mechanical Keyboard K8",
        price: "$89.00",
        availability: "In Stock",
        description: "Hot-swappable tenkeyless keyboard with white backlight.",
    },
];

/// Result of one product lookup
#[derive(Debug, Clone)]
pub struct ProductAnswer {
    /// Matched catalog entry, if any
    pub matched: Option<&'static Product>,
    /// Customer-facing message
    pub message: String,
}

/// Look up product details by name or by a query mentioning the name.
pub fn product_info(identifier: &str) -> ProductAnswer {
    let needle = identifier.trim().to_lowercase();

    let matched = if needle.is_empty() {
        None
    } else {
        CATALOG.iter().find(|p| {
            let key = p.name.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        })
    };

    let message = match matched {
        Some(product) => format!(
            "{}: {} Price: {}. Availability: {}.",
            product.name, product.description, product.price, product.availability
        ),
        None => {
            let names: Vec<&str> = CATALOG.iter().map(|p| p.name).collect();
            format!(
                "I couldn't find that product in our catalog. We currently carry: {}.",
                names.join(", ")
            )
        },
    };

    ProductAnswer { matched, message }
}
