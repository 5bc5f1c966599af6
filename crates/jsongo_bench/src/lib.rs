//! Benchmark utilities.

use jsongo_core::{Document, Value};
use rand::Rng;

/// Cities drawn by [`random_document`], small so queries have several hits.
pub const CITIES: &[&str] = &["lisbon", "oslo", "lima", "kyoto", "accra"];

/// Generate a random user-like document with roughly `payload` bytes of text.
pub fn random_document(rng: &mut impl Rng, payload: usize) -> Document {
    let bio: String = (0..payload)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect();
    let tags: Vec<Value> = (0..rng.gen_range(0..4))
        .map(|i| Value::from(format!("tag{i}")))
        .collect();

    Document::new()
        .with("age", rng.gen_range(0..100i64))
        .with("city", CITIES[rng.gen_range(0..CITIES.len())])
        .with("score", rng.gen::<f64>())
        .with("active", rng.gen::<bool>())
        .with("tags", tags)
        .with("bio", bio)
}

/// Generate a batch of random documents.
pub fn generate_documents(count: usize, payload: usize) -> Vec<Document> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| random_document(&mut rng, payload))
        .collect()
}
