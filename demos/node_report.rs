//! Prints the NUMA view of this process.
//!
//! Run with `cargo run --example node_report --features numa` to query
//! libnuma, or without the feature to see the fallback answers.

use numaport::numa::{contained_page_addresses, touch_pages};
use numaport::{HugePagesStatus, NodeUsage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(true).init();

    if let Some(status) = std::env::args().nth(1) {
        numaport::config::set_huge_pages_status(status.parse::<HugePagesStatus>()?);
    }

    println!("numaport {} NUMA Report", numaport::VERSION);
    println!("==========================");
    println!("  libnuma linked: {}", numaport::platform::is_capability_gated());
    println!("  Available:      {}", numaport::numa_available());
    println!("  Huge pages:     {}", numaport::config::huge_pages_status());
    println!("  Page size:      {} bytes", numaport::numa_pagesize());

    let node_count = match numaport::node_count() {
        Some(count) => count,
        None => {
            println!("\nNUMA is not available; skipping page placement.");
            return Ok(());
        }
    };
    println!("  Nodes:          {}", node_count);

    let page_size = numaport::platform::os_page_size() as usize;
    let buffer = vec![0x5Au8; 256 * page_size];
    let pages = contained_page_addresses(buffer.as_ptr(), buffer.len(), page_size)?;
    unsafe { touch_pages(&pages) };

    let nodes = numaport::query_page_nodes(0, &pages)?;
    let usage = NodeUsage::from_statuses(&nodes, node_count - 1);

    println!("\nPlacement of a {} page buffer:", pages.len());
    for (node, bytes) in usage.bytes_per_node(page_size).iter().enumerate() {
        println!("  node {}: {} pages, {} bytes", node, usage.pages_per_node[node], bytes);
    }
    println!("  unknown: {} pages", usage.failed);

    Ok(())
}
