//! Combine stage: drain everything, sort, join with `_`, emit one item.

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::error::StageResult;
use crate::utils::config::COMBINE_SEPARATOR;
use crate::{Item, Stage};

use super::context::send_item;

/// Called with the number of items just received (always 1 here).
pub type ProgressFn = Box<dyn Fn(usize) + Send + Sync>;

#[derive(Default)]
pub struct Combine {
    on_item: Option<ProgressFn>,
}

impl Combine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, on_item: ProgressFn) -> Self {
        self.on_item = Some(on_item);
        self
    }
}

/// Sort ascending and join with the combine separator.
pub fn combine_results(mut results: Vec<String>) -> String {
    results.sort();
    results.join(COMBINE_SEPARATOR)
}

impl Stage for Combine {
    fn name(&self) -> &str {
        "combine"
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>) -> StageResult {
        let mut results = Vec::new();
        for item in input.iter() {
            results.push(item.into_text());
            if let Some(on_item) = &self.on_item {
                on_item(1);
            }
        }
        debug!("{}: combining {} results", self.name(), results.len());
        send_item(&output, Item::Text(combine_results(results)), self.name())
    }
}
