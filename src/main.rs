//! svc-profile entry point.
//!
//! Prints the service instance record of this process as JSON.

use svc_profile::run;

fn main() -> anyhow::Result<()> {
    run()
}
