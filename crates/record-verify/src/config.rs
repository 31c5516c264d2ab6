//! Per-record-type configuration bundle.
//!
//! A [`TypeConfig`] binds one schema to the strategies every comparison of
//! that schema uses: serializer, key extractor (which also defines the sort
//! order), equaler, fuzzy matcher and renderer. Configurations are cheap to
//! clone and never mutated in place; the `with_*` methods return derived
//! configurations and leave the original untouched.

use crate::distance::{
    DoubleValueSimilarity, IntegerValueSimilarity, RecordDistance, ValueSimilarity,
};
use crate::equality::{Equaler, SchemaEqualer};
use crate::key::KeyExtractor;
use crate::matcher::{EqualityValueMatcher, FuzzyValueMatcher, NaiveFuzzyValueMatcher};
use crate::render::{Renderer, TupleRenderer};
use crate::serializer::{JsonLinesSerializer, RecordSerializer};
use record_core::{Record, Schema};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Shareable record ordering handed to sort collaborators.
pub type RecordComparator = Arc<dyn Fn(&Record, &Record) -> Ordering + Send + Sync>;

/// Strategies for comparing records of one schema.
#[derive(Debug, Clone)]
pub struct TypeConfig {
    schema: Arc<Schema>,
    serializer: Arc<dyn RecordSerializer>,
    key_extractor: Arc<KeyExtractor>,
    equaler: Arc<dyn Equaler>,
    matcher: Arc<dyn FuzzyValueMatcher>,
    renderer: Arc<dyn Renderer>,
    distance: Option<Arc<RecordDistance>>,
}

impl TypeConfig {
    /// Default configuration for a schema: JSON lines serializer, key over
    /// the key fields, exact field equality and tuple rendering.
    pub fn for_schema(schema: Schema) -> Self {
        let equaler: Arc<dyn Equaler> = Arc::new(SchemaEqualer::for_schema(&schema));
        Self {
            key_extractor: Arc::new(KeyExtractor::for_schema(&schema)),
            matcher: Arc::new(EqualityValueMatcher::new(Arc::clone(&equaler))),
            equaler,
            serializer: Arc::new(JsonLinesSerializer),
            renderer: Arc::new(TupleRenderer),
            distance: None,
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn serializer(&self) -> &Arc<dyn RecordSerializer> {
        &self.serializer
    }

    pub fn key_extractor(&self) -> &KeyExtractor {
        &self.key_extractor
    }

    pub fn equaler(&self) -> &Arc<dyn Equaler> {
        &self.equaler
    }

    pub fn matcher(&self) -> &Arc<dyn FuzzyValueMatcher> {
        &self.matcher
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Record distance of an approximate configuration.
    pub fn distance(&self) -> Option<&RecordDistance> {
        self.distance.as_deref()
    }

    /// Order two records by key.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.key_extractor.compare(a, b)
    }

    /// The key ordering as a standalone closure.
    pub fn comparator(&self) -> RecordComparator {
        let key = Arc::clone(&self.key_extractor);
        Arc::new(move |a: &Record, b: &Record| key.compare(a, b))
    }

    pub fn with_key_extractor(&self, key_extractor: KeyExtractor) -> Self {
        Self {
            key_extractor: Arc::new(key_extractor),
            ..self.clone()
        }
    }

    /// Replace the equaler. An exact matcher is rebuilt around it; an
    /// approximate matcher is kept.
    pub fn with_equaler(&self, equaler: Arc<dyn Equaler>) -> Self {
        let matcher: Arc<dyn FuzzyValueMatcher> = match self.distance {
            Some(_) => Arc::clone(&self.matcher),
            None => Arc::new(EqualityValueMatcher::new(Arc::clone(&equaler))),
        };
        Self {
            equaler,
            matcher,
            ..self.clone()
        }
    }

    /// Replace the matcher. The record distance of a previous tolerance
    /// override no longer applies afterwards.
    pub fn with_matcher(&self, matcher: Arc<dyn FuzzyValueMatcher>) -> Self {
        Self {
            matcher,
            distance: None,
            ..self.clone()
        }
    }

    pub fn with_renderer(&self, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            ..self.clone()
        }
    }

    pub fn with_serializer(&self, serializer: Arc<dyn RecordSerializer>) -> Self {
        Self {
            serializer,
            ..self.clone()
        }
    }

    /// Derive a configuration that accepts doubles differing by at most
    /// `delta`.
    pub fn with_double_delta(&self, delta: f64) -> Self {
        self.with_similarity(Arc::new(DoubleValueSimilarity::new(delta)))
    }

    /// Derive a configuration that accepts integers differing by at most
    /// `delta`.
    pub fn with_integer_delta(&self, delta: u64) -> Self {
        self.with_similarity(Arc::new(IntegerValueSimilarity::new(delta)))
    }

    /// Derive an approximate configuration.
    ///
    /// The similarity is registered for every field it applies to, those
    /// fields leave the key, and the matcher becomes a
    /// [`NaiveFuzzyValueMatcher`] over the extended record distance. An
    /// existing record distance is extended rather than replaced.
    pub fn with_similarity(&self, similarity: Arc<dyn ValueSimilarity>) -> Self {
        let mut distance = self.distance.as_deref().cloned().unwrap_or_default();
        let mut key_extractor = (*self.key_extractor).clone();

        for (index, field) in self.schema.fields.iter().enumerate() {
            if similarity.is_applicable(field.field_type) {
                distance.add_field_similarity(index, Arc::clone(&similarity));
                key_extractor.remove_key(index);
            }
        }
        debug!(
            "Derived approximate config for '{}' with {similarity:?}, key fields {:?}",
            self.schema.name,
            key_extractor.indices()
        );

        let distance = Arc::new(distance);
        Self {
            key_extractor: Arc::new(key_extractor),
            matcher: Arc::new(NaiveFuzzyValueMatcher::new(distance.clone())),
            distance: Some(distance),
            ..self.clone()
        }
    }
}
