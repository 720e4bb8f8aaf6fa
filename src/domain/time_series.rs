// Occupancy time series domain models
use serde::Serialize;
use std::collections::VecDeque;

/// Number of samples the chart window holds.
pub const WINDOW_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub occupied: u32,
    pub vacant: u32,
}

impl TimeSeriesPoint {
    pub fn new(label: impl Into<String>, occupied: u32, vacant: u32) -> Self {
        Self {
            label: label.into(),
            occupied,
            vacant,
        }
    }
}

/// Parallel label/value sequences handed to the chart, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub occupied: Vec<u32>,
    pub vacant: Vec<u32>,
}

/// Sliding window of the most recent samples. Insertion order is temporal order.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuffer {
    points: VecDeque<TimeSeriesPoint>,
}

impl TimeSeriesBuffer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
        }
    }

    /// Append a sample, evicting the oldest one once the window is full.
    pub fn append(&mut self, point: TimeSeriesPoint) {
        self.points.push_back(point);
        if self.points.len() > WINDOW_CAPACITY {
            self.points.pop_front();
        }
    }

    pub fn to_series(&self) -> Series {
        let mut series = Series {
            labels: Vec::with_capacity(self.points.len()),
            occupied: Vec::with_capacity(self.points.len()),
            vacant: Vec::with_capacity(self.points.len()),
        };
        for point in &self.points {
            series.labels.push(point.label.clone());
            series.occupied.push(point.occupied);
            series.vacant.push(point.vacant);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: u32) -> TimeSeriesPoint {
        TimeSeriesPoint::new(format!("t{}", i), i, 100 - i)
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut buffer = TimeSeriesBuffer::new();
        for i in 0..57 {
            buffer.append(point(i));
            assert!(buffer.len() <= WINDOW_CAPACITY);
            assert_eq!(buffer.len(), (i as usize + 1).min(WINDOW_CAPACITY));
        }
    }

    #[test]
    fn test_window_keeps_most_recent_in_order() {
        let mut buffer = TimeSeriesBuffer::new();
        for i in 0..45 {
            buffer.append(point(i));
        }

        let series = buffer.to_series();
        let expected: Vec<u32> = (25..45).collect();
        assert_eq!(series.occupied, expected);
        assert_eq!(series.labels.last().map(String::as_str), Some("t44"));
    }

    #[test]
    fn test_partial_window_keeps_everything() {
        let mut buffer = TimeSeriesBuffer::new();
        for i in 0..3 {
            buffer.append(point(i));
        }

        let series = buffer.to_series();
        assert_eq!(series.labels, vec!["t0", "t1", "t2"]);
        assert_eq!(series.occupied, vec![0, 1, 2]);
        assert_eq!(series.vacant, vec![100, 99, 98]);
    }

    #[test]
    fn test_series_sequences_stay_parallel() {
        let mut buffer = TimeSeriesBuffer::new();
        assert_eq!(buffer.to_series(), Series::default());

        for i in 0..30 {
            buffer.append(point(i));
            let series = buffer.to_series();
            assert_eq!(series.labels.len(), series.occupied.len());
            assert_eq!(series.occupied.len(), series.vacant.len());
            assert_eq!(series.labels.len(), buffer.len());
            assert_eq!(series.labels.last(), Some(&format!("t{}", i)));
        }
    }
}
