//! Property tests for transport spec parsing.

use proptest::prelude::*;

use ovn_rebuilder::infrastructure::sync::TransportSpec;

fn remote() -> impl Strategy<Value = String> {
    proptest::string::string_regex("([a-z]{1,8}@)?[a-z0-9][a-z0-9.-]{0,15}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,128}") {
        let _ = TransportSpec::parse(&s);
    }

    /// PROPERTY: a well-formed single-type spec binds exactly its remotes, in order.
    #[test]
    fn property_single_type_binds_remotes(
        kind in "(lxd|ssh)",
        remotes in proptest::collection::vec(remote(), 1..6)
    ) {
        let spec = remotes
            .iter()
            .map(|r| format!("{}:{}", kind, r))
            .collect::<Vec<_>>()
            .join(",");

        let parsed = TransportSpec::parse(&spec).unwrap();
        prop_assert_eq!(parsed.kind, kind);
        prop_assert_eq!(parsed.remotes, remotes);
    }

    /// PROPERTY: mixing two transport types is always rejected.
    #[test]
    fn property_mixed_types_rejected(
        first in remote(),
        second in remote()
    ) {
        let spec = format!("lxd:{},ssh:{}", first, second);
        prop_assert!(TransportSpec::parse(&spec).is_err());
    }
}
