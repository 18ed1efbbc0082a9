//! Read-only performance projection over production history.
//!
//! Everything here is a pure function of a process/queue snapshot and the
//! catalog, so a report can be rebuilt at any time from the actors' `list()`.
//!
//! Durations are reported in seconds. Efficiency is
//! `Σ ideal time / Σ actual net time × 100` over finished processes: above 100
//! means faster than the configured ideal.

use crate::model::{
    Catalog, CategoryId, EmployeeId, OrderProcess, OrderQueue, ProcessStatus, RuleId,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Tally {
    finished: u32,
    canceled: u32,
    in_progress: u32,
    working: Duration,
    paused: Duration,
    // Only processes whose rule is still in the catalog.
    ideal: Duration,
    measured: Duration,
}

impl Tally {
    fn record(&mut self, process: &OrderProcess, ideal: Option<Duration>) {
        match process.status {
            ProcessStatus::Finished => {
                self.finished += 1;
                let net = process.duration.unwrap_or_else(Duration::zero);
                self.working += net;
                self.paused += process.total_paused;
                if let Some(ideal) = ideal {
                    self.ideal += ideal;
                    self.measured += net;
                }
            }
            ProcessStatus::Canceled => self.canceled += 1,
            _ => self.in_progress += 1,
        }
    }

    fn avg_duration_secs(&self) -> Option<f64> {
        average(self.working, self.finished)
    }

    fn avg_pause_secs(&self) -> Option<f64> {
        average(self.paused, self.finished)
    }

    fn efficiency_pct(&self) -> Option<f64> {
        if self.measured <= Duration::zero() {
            return None;
        }
        Some(secs(self.ideal) / secs(self.measured) * 100.0)
    }
}

fn secs(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

fn average(total: Duration, count: u32) -> Option<f64> {
    (count > 0).then(|| secs(total) / f64::from(count))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    pub category_id: CategoryId,
    pub name: String,
    pub finished: u32,
    pub canceled: u32,
    pub in_progress: u32,
    pub avg_duration_secs: Option<f64>,
    pub avg_pause_secs: Option<f64>,
    /// Mean wait between consecutive stages, over closed queues.
    pub avg_queue_secs: Option<f64>,
    pub efficiency_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMetrics {
    pub rule_id: RuleId,
    pub name: String,
    pub order: u32,
    pub category_id: CategoryId,
    pub finished: u32,
    pub canceled: u32,
    pub avg_duration_secs: Option<f64>,
    pub ideal_secs: Option<f64>,
    /// Mean wait before this stage started.
    pub avg_queue_secs: Option<f64>,
    pub efficiency_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeMetrics {
    pub employee_id: EmployeeId,
    pub finished: u32,
    pub canceled: u32,
    pub in_progress: u32,
    pub avg_duration_secs: Option<f64>,
    pub avg_pause_secs: Option<f64>,
    pub efficiency_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<CategoryMetrics>,
    pub rules: Vec<RuleMetrics>,
    pub employees: Vec<EmployeeMetrics>,
    /// Group items currently waiting for their next stage.
    pub open_queues: usize,
}

#[derive(Default)]
struct Waits {
    total: Duration,
    count: u32,
}

impl Waits {
    fn add(&mut self, d: Duration) {
        self.total += d;
        self.count += 1;
    }

    fn avg_secs(&self) -> Option<f64> {
        average(self.total, self.count)
    }
}

fn closed_waits<K: Ord>(queues: &[OrderQueue], key: impl Fn(&OrderQueue) -> K) -> BTreeMap<K, Waits> {
    let mut waits: BTreeMap<K, Waits> = BTreeMap::new();
    for queue in queues {
        if let Some(d) = queue.duration {
            waits.entry(key(queue)).or_default().add(d);
        }
    }
    waits
}

fn ideal_time(catalog: &Catalog, rule: RuleId) -> Option<Duration> {
    catalog.rule(rule).ok().map(|r| r.ideal_time)
}

pub fn category_metrics(
    processes: &[OrderProcess],
    queues: &[OrderQueue],
    catalog: &Catalog,
) -> Vec<CategoryMetrics> {
    let mut tallies: BTreeMap<CategoryId, Tally> = BTreeMap::new();
    for process in processes {
        tallies
            .entry(process.category_id)
            .or_default()
            .record(process, ideal_time(catalog, process.rule_id));
    }
    let waits = closed_waits(queues, |q| q.category_id);

    tallies
        .into_iter()
        .map(|(category_id, tally)| CategoryMetrics {
            category_id,
            name: catalog
                .category(category_id)
                .map(|c| c.name)
                .unwrap_or_else(|_| category_id.to_string()),
            finished: tally.finished,
            canceled: tally.canceled,
            in_progress: tally.in_progress,
            avg_duration_secs: tally.avg_duration_secs(),
            avg_pause_secs: tally.avg_pause_secs(),
            avg_queue_secs: waits.get(&category_id).and_then(Waits::avg_secs),
            efficiency_pct: tally.efficiency_pct(),
        })
        .collect()
}

/// Ordered by category, then stage order.
pub fn rule_metrics(
    processes: &[OrderProcess],
    queues: &[OrderQueue],
    catalog: &Catalog,
) -> Vec<RuleMetrics> {
    let mut tallies: BTreeMap<(CategoryId, u32, RuleId), Tally> = BTreeMap::new();
    for process in processes {
        tallies
            .entry((process.category_id, process.rule_order, process.rule_id))
            .or_default()
            .record(process, ideal_time(catalog, process.rule_id));
    }
    let waits = closed_waits(queues, |q| q.to_rule);

    tallies
        .into_iter()
        .map(|((category_id, order, rule_id), tally)| {
            let rule = catalog.rule(rule_id).ok();
            RuleMetrics {
                rule_id,
                name: rule
                    .as_ref()
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| rule_id.to_string()),
                order,
                category_id,
                finished: tally.finished,
                canceled: tally.canceled,
                avg_duration_secs: tally.avg_duration_secs(),
                ideal_secs: rule.map(|r| secs(r.ideal_time)),
                avg_queue_secs: waits.get(&rule_id).and_then(Waits::avg_secs),
                efficiency_pct: tally.efficiency_pct(),
            }
        })
        .collect()
}

/// Processes never started have no employee and are left out.
pub fn employee_metrics(processes: &[OrderProcess], catalog: &Catalog) -> Vec<EmployeeMetrics> {
    let mut tallies: BTreeMap<EmployeeId, Tally> = BTreeMap::new();
    for process in processes {
        if let Some(employee_id) = process.employee_id {
            tallies
                .entry(employee_id)
                .or_default()
                .record(process, ideal_time(catalog, process.rule_id));
        }
    }

    tallies
        .into_iter()
        .map(|(employee_id, tally)| EmployeeMetrics {
            employee_id,
            finished: tally.finished,
            canceled: tally.canceled,
            in_progress: tally.in_progress,
            avg_duration_secs: tally.avg_duration_secs(),
            avg_pause_secs: tally.avg_pause_secs(),
            efficiency_pct: tally.efficiency_pct(),
        })
        .collect()
}

pub fn performance_report(
    processes: &[OrderProcess],
    queues: &[OrderQueue],
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> PerformanceReport {
    PerformanceReport {
        generated_at: now,
        categories: category_metrics(processes, queues, catalog),
        rules: rule_metrics(processes, queues, catalog),
        employees: employee_metrics(processes, catalog),
        open_queues: queues.iter().filter(|q| q.is_open()).count(),
    }
}
