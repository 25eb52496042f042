//! Book — the catalog record a subscriber selects from.
//!
//! A book is copied into an order at acceptance time and is immutable from
//! then on; later catalog changes never rewrite order history.

use serde::{Deserialize, Serialize};

/// A snapshot of one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  pub id:             String,
  pub title:          String,
  pub author:         String,
  pub description:    String,
  /// One of the curated genre ids (see [`BookGenre::curated`]), or whatever
  /// the catalog mapped the source categories to.
  pub genre:          String,
  pub isbn:           String,
  pub cover_image:    String,
  pub published_date: String,
  pub page_count:     u32,
  pub rating:         f64,
}

// ─── Genres ──────────────────────────────────────────────────────────────────

/// A curated genre shown by the catalog browsing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookGenre {
  pub id:          String,
  pub name:        String,
  pub description: String,
  /// Display accent colour, as a hex string.
  pub color:       String,
}

impl BookGenre {
  fn new(id: &str, name: &str, description: &str, color: &str) -> Self {
    Self {
      id:          id.to_owned(),
      name:        name.to_owned(),
      description: description.to_owned(),
      color:       color.to_owned(),
    }
  }

  /// The eight genres the subscription curates selections from.
  pub fn curated() -> Vec<BookGenre> {
    vec![
      Self::new("romance", "Romance", "Love stories and romantic fiction", "#f472b6"),
      Self::new("mystery", "Mystery", "Suspenseful and intriguing stories", "#6366f1"),
      Self::new("fantasy", "Fantasy", "Magical worlds and adventures", "#8b5cf6"),
      Self::new(
        "literary",
        "Literary Fiction",
        "Thought-provoking and artistic works",
        "#10b981",
      ),
      Self::new(
        "historical",
        "Historical Fiction",
        "Stories set in the past",
        "#f59e0b",
      ),
      Self::new("thriller", "Thriller", "Fast-paced and exciting stories", "#ef4444"),
      Self::new(
        "contemporary",
        "Contemporary Fiction",
        "Modern stories and characters",
        "#06b6d4",
      ),
      Self::new("classics", "Classics", "Timeless literary works", "#84cc16"),
    ]
  }
}
