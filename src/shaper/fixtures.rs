//! Sample catalog and canned text used when the retrieval service has nothing
//! to say. This is demonstration content; swapping it out does not affect
//! the caching or annotation logic.

/// A product from the built-in sample catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleProduct {
    pub id: &'static str,
    pub title: &'static str,
    pub snippet: &'static str,
    /// One-line pitch used in synthesized answers
    pub summary: &'static str,
    pub price: &'static str,
    pub image: &'static str,
    pub link: &'static str,
    pub brand: &'static str,
    pub category: &'static str,
    pub availability: &'static str,
}

pub const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        id: "1",
        title: "Classic Blue Cotton Shirt",
        snippet: "Premium quality blue cotton shirt with modern fit. Perfect for casual and business occasions.",
        summary: "Perfect for both casual and business occasions",
        price: "MMK 25,000",
        image: "https://images.unsplash.com/photo-1596755094514-f87e34085b2c?w=200",
        link: "https://ayazay.com/products/blue-cotton-shirt",
        brand: "AYAZay",
        category: "Shirts",
        availability: "In Stock",
    },
    SampleProduct {
        id: "2",
        title: "Blue Denim Work Shirt",
        snippet: "Durable blue denim shirt ideal for casual wear. Made from 100% cotton with reinforced stitching.",
        summary: "Durable and ideal for casual wear",
        price: "MMK 35,000",
        image: "https://images.unsplash.com/photo-1594938298603-c8148c4dae35?w=200",
        link: "https://ayazay.com/products/blue-denim-shirt",
        brand: "AYAZay",
        category: "Shirts",
        availability: "In Stock",
    },
    SampleProduct {
        id: "3",
        title: "Navy Blue Formal Shirt",
        snippet: "Elegant navy blue formal shirt perfect for office wear. Wrinkle-resistant fabric with classic collar.",
        summary: "Elegant option for office wear",
        price: "MMK 45,000",
        image: "https://images.unsplash.com/photo-1602810318383-e386cc2a3ccf?w=200",
        link: "https://ayazay.com/products/navy-blue-formal-shirt",
        brand: "AYAZay",
        category: "Formal Wear",
        availability: "In Stock",
    },
    SampleProduct {
        id: "4",
        title: "Light Blue Casual Shirt",
        snippet: "Comfortable light blue casual shirt made from breathable cotton blend. Great for everyday wear.",
        summary: "Comfortable everyday option",
        price: "MMK 28,000",
        image: "https://images.unsplash.com/photo-1598300042247-d088f8ab3a91?w=200",
        link: "https://ayazay.com/products/light-blue-casual-shirt",
        brand: "AYAZay",
        category: "Casual Wear",
        availability: "Limited Stock",
    },
    SampleProduct {
        id: "5",
        title: "Blue Plaid Button-Down",
        snippet: "Stylish blue plaid button-down shirt with long sleeves. Perfect for layering or wearing alone.",
        summary: "Stylish with long sleeves",
        price: "MMK 32,000",
        image: "https://images.unsplash.com/photo-1607345366928-199ea26cfe3e?w=200",
        link: "https://ayazay.com/products/blue-plaid-shirt",
        brand: "AYAZay",
        category: "Casual Wear",
        availability: "In Stock",
    },
];

// == Synthesized search ==
pub const SAMPLE_RELEVANCE_SCORE: f64 = 0.9;
pub const SAMPLE_ATTRIBUTION_TOKEN: &str = "mock-token";
pub const SAMPLE_QUERY_ID: &str = "mock-query-id";

// == Synthesized answers ==
/// Queries containing this phrase get a product listing instead of the generic reply
pub const ANSWER_INTENT: &str = "blue shirt";

pub const LISTED_RESULTS_INTRO: &str = "Here are some blue shirts available on AYAZay:\n\n";
pub const LISTED_RESULTS_OUTRO: &str = "I hope this helps you find what you're looking for!";
pub const CATALOG_INTRO: &str = "We have several excellent blue shirts available on AYAZay!\n\n";
pub const CATALOG_OUTRO: &str =
    "All shirts are made from high-quality materials and are currently in stock.";
pub const GENERIC_ANSWER: &str =
    "Thank you for your interest in AYAZay products! We offer a wide range of quality clothing items.";

pub const RELATED_QUESTIONS: [&str; 4] = [
    "What sizes are available for blue shirts?",
    "Do you have blue shirts in cotton?",
    "What is the return policy for shirts?",
    "How much is the blue denim shirt?",
];

/// Answer state reported for synthesized answers
pub const SUCCEEDED: &str = "SUCCEEDED";
