//! `bidserve score` – score a single bid with the configured weight.

use bidserve_core::config::SimConfig;
use bidserve_core::score;

pub fn run_score(cfg: &SimConfig, size: u64, wait: f64, bidders: usize) {
    let bidders = bidders.max(1);
    let value = score(bidders, size, wait.max(0.0), cfg.auction_weight);
    println!(
        "score({} bytes, wait {:.2} s, {} bidders) = {:.4}",
        size, wait, bidders, value
    );
}
