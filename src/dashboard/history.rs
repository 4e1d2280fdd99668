//! Sliding chart windows
//!
//! Each chart keeps the last N points (60 by default) across one or more
//! aligned series. Pushing past capacity evicts the oldest point of every series.

use std::collections::VecDeque;

use serde::Serialize;

/// Default number of retained chart points.
pub const DEFAULT_CAPACITY: usize = 60;

/// Fixed-capacity window of labelled points shared by several series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesWindow {
    names: Vec<String>,
    labels: VecDeque<String>,
    series: Vec<VecDeque<Option<f64>>>,
    capacity: usize,
}

impl SeriesWindow {
    /// Creates an empty window with one series per name.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, capacity: usize) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let capacity = capacity.max(1);
        let series = names
            .iter()
            .map(|_| VecDeque::with_capacity(capacity))
            .collect();
        Self {
            names,
            labels: VecDeque::with_capacity(capacity),
            series,
            capacity,
        }
    }

    /// Appends a point, evicting the oldest if at capacity.
    ///
    /// Missing trailing values are recorded as gaps; extra values are dropped.
    pub fn push(&mut self, label: impl Into<String>, values: &[Option<f64>]) {
        self.labels.push_back(label.into());
        for (i, series) in self.series.iter_mut().enumerate() {
            series.push_back(values.get(i).copied().flatten());
        }

        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            for series in &mut self.series {
                series.pop_front();
            }
        }
    }

    /// Labels in chronological order (oldest first)
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Values of series `index` in chronological order.
    pub fn values(&self, index: usize) -> Vec<Option<f64>> {
        self.series
            .get(index)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Most recent value of series `index`.
    pub fn latest(&self, index: usize) -> Option<f64> {
        self.series.get(index).and_then(|s| s.back().copied().flatten())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of points currently stored
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
