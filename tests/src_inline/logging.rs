use super::*;

#[test]
fn test_init_twice_keeps_first_subscriber() {
    init(0);
    init(2);
    tracing::debug!("still logging after a second init");
}
