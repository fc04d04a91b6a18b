// lib/src/graph_evolution/time_window.rs

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use models::vertices::validate_partition;
use models::{Partition, Timepoint, ValidationError, ValidationResult};

/// A half-open range of calendar days, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        TimeWindow { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day < self.end
    }

    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days().max(0) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days() as i64).map(move |offset| self.start + Duration::days(offset))
    }

    /// One `MMDD` label per day, zero padded.
    pub fn daily_labels(&self) -> ValidationResult<Vec<Timepoint>> {
        self.days()
            .map(|day| Timepoint::new(format!("{:02}{:02}", day.month(), day.day())))
            .collect()
    }
}

/// Ordered timepoints with the partition found at each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    timepoints: Vec<Timepoint>,
    partitions: Vec<Partition>,
}

impl Timeline {
    /// # Errors
    /// `PartitionCountMismatch` when the two sequences differ in length,
    /// `DuplicateTimepoint` for a repeated label, and any partition error
    /// from [`validate_partition`].
    pub fn new(timepoints: Vec<Timepoint>, partitions: Vec<Partition>) -> ValidationResult<Self> {
        if timepoints.len() != partitions.len() {
            return Err(ValidationError::PartitionCountMismatch(timepoints.len(), partitions.len()));
        }

        let mut seen = HashSet::new();
        for (timepoint, partition) in timepoints.iter().zip(&partitions) {
            if !seen.insert(*timepoint) {
                return Err(ValidationError::DuplicateTimepoint(timepoint.to_string()));
            }
            validate_partition(timepoint, partition)?;
        }

        Ok(Timeline { timepoints, partitions })
    }

    /// Like [`Timeline::new`], parsing raw labels first.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], partitions: Vec<Partition>) -> ValidationResult<Self> {
        let timepoints = labels
            .iter()
            .map(|label| Timepoint::new(label.as_ref()))
            .collect::<ValidationResult<Vec<_>>>()?;
        Timeline::new(timepoints, partitions)
    }

    pub fn timepoints(&self) -> &[Timepoint] {
        &self.timepoints
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.timepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timepoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timepoint, &Partition)> + '_ {
        self.timepoints.iter().copied().zip(self.partitions.iter())
    }

    pub fn partition_at(&self, position: usize) -> Option<&Partition> {
        self.partitions.get(position)
    }
}
