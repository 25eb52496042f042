//! Async client for the Google Books volumes API.
//!
//! Implements [`BookCatalog`]: free-text search, per-genre subject queries,
//! and the merged curated selection shown before any search. Responses are
//! cached per query so repeated browsing does not re-fetch.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, PoisonError},
  time::Duration,
};

use fabledrop_core::{book::Book, catalog::BookCatalog};
use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};

/// Inline SVG shown when a volume carries no cover image at all.
const NO_COVER_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='600' viewBox='0 0 400 600'%3E%3Crect width='400' height='600' fill='%23f3f4f6'/%3E%3Ctext x='200' y='300' font-family='Arial, sans-serif' font-size='24' fill='%239ca3af' text-anchor='middle' dy='0.3em'%3ENo Cover%3C/text%3E%3C/svg%3E";

/// Genre ids fetched for the curated selection, eight books each.
const CURATED_GENRES: [&str; 8] = [
  "romance",
  "mystery",
  "fantasy",
  "literary",
  "historical",
  "thriller",
  "contemporary",
  "classics",
];
const CURATED_PER_GENRE: usize = 8;

const POPULAR_QUERIES: [&str; 4] = [
  "bestseller fiction",
  "award winning fiction",
  "popular fiction",
  "goodreads choice fiction",
];

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the volumes API.
#[derive(Debug, Clone)]
pub struct BooksConfig {
  pub base_url: String,
  /// Optional API key; without one Google applies tighter rate limits.
  pub api_key:  Option<String>,
}

impl Default for BooksConfig {
  fn default() -> Self {
    Self {
      base_url: "https://www.googleapis.com/books/v1".to_owned(),
      api_key:  None,
    }
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
  pub id:          String,
  #[serde(default)]
  pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
  pub title:                Option<String>,
  pub authors:              Option<Vec<String>>,
  pub description:          Option<String>,
  pub published_date:       Option<String>,
  pub page_count:           Option<u32>,
  pub categories:           Option<Vec<String>>,
  pub image_links:          Option<ImageLinks>,
  pub average_rating:       Option<f64>,
  pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
  pub thumbnail: Option<String>,
  pub small:     Option<String>,
  pub medium:    Option<String>,
  pub large:     Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
  #[serde(rename = "type")]
  pub kind:       String,
  pub identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
  pub items:       Option<Vec<Volume>>,
  #[serde(default)]
  pub total_items: u64,
}

// ─── Conversion ──────────────────────────────────────────────────────────────

/// Map a raw volume onto the domain [`Book`] snapshot, filling the
/// documented defaults for every absent field.
pub fn convert_volume(volume: Volume) -> Book {
  let info = volume.volume_info;

  // Best available cover, largest first.
  let cover_image = info
    .image_links
    .as_ref()
    .and_then(|links| {
      links
        .large
        .clone()
        .or_else(|| links.medium.clone())
        .or_else(|| links.small.clone())
        .or_else(|| links.thumbnail.clone())
    })
    .unwrap_or_else(|| NO_COVER_PLACEHOLDER.to_owned());

  // ISBN-13 preferred, ISBN-10 accepted.
  let identifiers = info.industry_identifiers.unwrap_or_default();
  let isbn = identifiers
    .iter()
    .find(|id| id.kind == "ISBN_13")
    .or_else(|| identifiers.iter().find(|id| id.kind == "ISBN_10"))
    .map(|id| id.identifier.clone())
    .unwrap_or_else(|| "N/A".to_owned());

  let genre = genre_for_categories(info.categories.as_deref().unwrap_or_default());

  Book {
    id: volume.id,
    title: info.title.unwrap_or_else(|| "Unknown Title".to_owned()),
    author: info
      .authors
      .map(|a| a.join(", "))
      .unwrap_or_else(|| "Unknown Author".to_owned()),
    description: info
      .description
      .unwrap_or_else(|| "No description available.".to_owned()),
    genre: genre.to_owned(),
    isbn,
    cover_image,
    published_date: info.published_date.unwrap_or_else(|| "Unknown".to_owned()),
    page_count: info.page_count.unwrap_or(0),
    rating: info.average_rating.unwrap_or(4.0),
  }
}

/// Collapse the source category strings onto the curated genre taxonomy.
pub fn genre_for_categories(categories: &[String]) -> &'static str {
  let joined = categories.join(" ").to_lowercase();

  if joined.contains("romance") {
    return "romance";
  }
  if joined.contains("mystery") || joined.contains("thriller") || joined.contains("crime")
  {
    return "mystery";
  }
  if joined.contains("fantasy")
    || joined.contains("magic")
    || joined.contains("supernatural")
  {
    return "fantasy";
  }
  if joined.contains("fiction")
    && (joined.contains("literary") || joined.contains("contemporary"))
  {
    return "literary";
  }
  if joined.contains("historical") {
    return "historical";
  }
  if joined.contains("thriller") || joined.contains("suspense") {
    return "thriller";
  }
  if joined.contains("fiction") {
    return "contemporary";
  }
  if joined.contains("classic") {
    return "classics";
  }

  "contemporary"
}

/// Drop later entries with the same `(title, author)`, case-insensitively.
fn dedup_books(books: &mut Vec<Book>) {
  let mut seen = HashSet::new();
  books.retain(|b| seen.insert((b.title.to_lowercase(), b.author.to_lowercase())));
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the Google Books volumes API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and the
/// response cache is shared between clones.
#[derive(Clone)]
pub struct GoogleBooksClient {
  client: Client,
  config: BooksConfig,
  cache:  Arc<Mutex<HashMap<String, Vec<Book>>>>,
}

impl GoogleBooksClient {
  pub fn new(config: BooksConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      config,
      cache: Arc::new(Mutex::new(HashMap::new())),
    })
  }

  /// `GET /volumes?q=<query>` — free-text search, English print books only.
  pub async fn search_books(
    &self,
    query: &str,
    max_results: usize,
  ) -> Result<Vec<Book>> {
    let cache_key = format!("{query}_{max_results}");
    if let Some(hit) = self.cache_get(&cache_key) {
      return Ok(hit);
    }

    let mut request = self
      .client
      .get(format!("{}/volumes", self.config.base_url))
      .query(&[
        ("q", query.to_owned()),
        ("maxResults", max_results.to_string()),
        ("printType", "books".to_owned()),
        ("langRestrict", "en".to_owned()),
      ]);
    if let Some(key) = &self.config.api_key {
      request = request.query(&[("key", key.as_str())]);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
      return Err(Error::Status {
        status:   response.status(),
        endpoint: "volumes",
      });
    }

    let data: VolumesResponse = response.json().await?;
    let books: Vec<Book> = data
      .items
      .unwrap_or_default()
      .into_iter()
      .map(convert_volume)
      .collect();

    self.cache_put(cache_key, books.clone());
    Ok(books)
  }

  /// Search within one curated genre via its fixed subject query.
  pub async fn books_by_genre(
    &self,
    genre: &str,
    max_results: usize,
  ) -> Result<Vec<Book>> {
    let query = match genre {
      "romance" => "subject:romance fiction",
      "mystery" => "subject:mystery fiction",
      "fantasy" => "subject:fantasy fiction",
      "literary" => "subject:literary fiction",
      "historical" => "subject:historical fiction",
      "thriller" => "subject:thriller fiction",
      "contemporary" => "subject:contemporary fiction",
      "classics" => "subject:classics literature",
      _ => "subject:fiction",
    };
    self.search_books(query, max_results).await
  }

  /// A merged bestseller selection, de-duplicated across queries.
  pub async fn popular_books(&self, max_results: usize) -> Result<Vec<Book>> {
    let per_query = (max_results / POPULAR_QUERIES.len()).max(1);

    let mut all = Vec::new();
    for query in POPULAR_QUERIES {
      all.extend(self.search_books(query, per_query).await?);
    }
    dedup_books(&mut all);
    all.truncate(max_results);
    Ok(all)
  }

  /// The curated mix: a handful of books from each curated genre.
  pub async fn curated_books(&self) -> Result<Vec<Book>> {
    let mut all = Vec::new();
    for genre in CURATED_GENRES {
      all.extend(self.books_by_genre(genre, CURATED_PER_GENRE).await?);
    }
    dedup_books(&mut all);
    Ok(all)
  }

  /// Forget every cached response; the next call re-fetches.
  pub fn clear_cache(&self) {
    self
      .cache
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clear();
  }

  fn cache_get(&self, key: &str) -> Option<Vec<Book>> {
    self
      .cache
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(key)
      .cloned()
  }

  fn cache_put(&self, key: String, books: Vec<Book>) {
    self
      .cache
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(key, books);
  }
}

impl BookCatalog for GoogleBooksClient {
  type Error = Error;

  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Book>> {
    self.search_books(query, max_results).await
  }

  async fn curated(&self) -> Result<Vec<Book>> {
    self.curated_books().await
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
