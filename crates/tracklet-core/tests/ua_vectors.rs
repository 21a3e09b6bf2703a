//! User-agent classification vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tracklet_core::device::{browser_name, os_name, DeviceDetails};
use tracklet_core::page::PageEnvironment;

use vector_loader::UaVector;

#[test]
fn ua_vectors() {
    let vectors: Vec<UaVector> = vector_loader::load("user_agents.json");
    assert!(!vectors.is_empty());

    for v in vectors {
        assert_eq!(browser_name(&v.user_agent), v.expect.browser, "vector={}", v.description);
        assert_eq!(os_name(&v.user_agent), v.expect.os, "vector={}", v.description);

        let env = PageEnvironment {
            user_agent: v.user_agent.clone(),
            screen_width: 390,
            screen_height: 844,
            ..PageEnvironment::default()
        };
        let d = DeviceDetails::detect(&env);
        assert_eq!(d.browser, v.expect.browser, "vector={}", v.description);
        assert_eq!(d.screen_resolution, "390x844");
    }
}
