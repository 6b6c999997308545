#![allow(clippy::unwrap_used)]

// Engine behaviour end to end: scripted device output in, commands and
// typed results out.

use ehctl_api::ScriptedTransport;
use ehctl_core::{
    ConfigItem, CoreError, Decoded, FactSubset, Failure, Mode, Outcome, RollbackStatus,
    RollbackTarget, Session,
};
use pretty_assertions::assert_eq;

const IP3_OLD: &str = "\
ip 3 ip-addr          : 10.0.0.9
ip 3 prefix-len       : 16
ip 3 vlan             : 0
";

const IP3_NEW: &str = "\
ip 3 ip-addr          : static 192.168.1.100
ip 3 prefix-len       : 24
ip 3 vlan             : 0
ip 3 default-gateway  : 192.168.1.1
";

fn session(transport: ScriptedTransport) -> Session<ScriptedTransport> {
    Session::new(transport)
}

#[test]
fn matching_ip_sends_no_set_command() {
    let mut session = session(ScriptedTransport::new().respond("show ip 3", IP3_NEW));
    let items = vec![ConfigItem::ip(3, "192.168.1.100", 24, 0)];

    let results = session.reconcile_batch(&items, Mode::Apply).unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results[0].changed);
    assert_eq!(results[0].outcome, Outcome::Unchanged);
    assert_eq!(session.transport().sent(), ["show ip 3"]);
}

#[test]
fn mismatched_ip_is_applied_then_verified() {
    let transport = ScriptedTransport::new()
        .respond("show ip 3", IP3_OLD)
        .respond("show ip 3", IP3_NEW)
        .respond(
            "set ip 3 ip-addr 192.168.1.100 prefix-len 24 vlan 0",
            "Set done: ip 3",
        );
    let mut session = session(transport);
    let item = ConfigItem::ip(3, "192.168.1.100", 24, 0);

    let first = session.reconcile_batch(&[item.clone()], Mode::Apply).unwrap();
    assert_eq!(first[0].outcome, Outcome::Applied);
    assert_eq!(first[0].observed.as_ref().and_then(|r| r.str("ip")), Some("192.168.1.100"));

    // The device now reflects the change; a second run is a no-op.
    let second = session.reconcile_batch(&[item], Mode::Apply).unwrap();
    assert!(!second[0].changed);

    let transport = session.into_transport();
    assert_eq!(
        transport.count("set ip 3 ip-addr 192.168.1.100 prefix-len 24 vlan 0"),
        1
    );
    assert_eq!(transport.count("show ip 3"), 3);
}

#[test]
fn acknowledgement_for_another_slot_is_a_failure() {
    let transport = ScriptedTransport::new()
        .respond("show ip 3", IP3_OLD)
        .respond(
            "set ip 3 ip-addr 192.168.1.100 prefix-len 24 vlan 0",
            "Set done: ip 5",
        );
    let mut session = session(transport);
    let results = session
        .reconcile_batch(&[ConfigItem::ip(3, "192.168.1.100", 24, 0)], Mode::Apply)
        .unwrap();
    assert!(matches!(
        results[0].failure(),
        Some(Failure::UnexpectedAcknowledgement { response }) if response == "Set done: ip 5"
    ));
    // Re-read after the stray acknowledgement.
    assert_eq!(results[0].observed.as_ref().and_then(|r| r.int("prefix_len")), Some(16));
    assert_eq!(session.transport().count("show ip 3"), 2);
}

#[test]
fn rejected_route_does_not_stop_the_batch() {
    let transport = ScriptedTransport::new()
        .respond("show route 1", "")
        .respond(
            "set route 1 dest 10.0.0.0 prefix-len 8 next-hop 192.168.1.1",
            "% Error: next-hop unreachable",
        )
        .respond("show route 2", "route 2 dest : 0.0.0.0\nroute 2 prefix-len : 0\nroute 2 next-hop : 192.168.1.254\n");
    let mut session = session(transport);
    let items = vec![
        ConfigItem::route(1, "10.0.0.0", 8, "192.168.1.1"),
        ConfigItem::route(2, "0.0.0.0", 0, "192.168.1.254"),
    ];

    let results = session.reconcile_batch(&items, Mode::Apply).unwrap();
    assert!(matches!(results[0].failure(), Some(Failure::Rejected { .. })));
    assert_eq!(results[1].outcome, Outcome::Unchanged);
    assert_eq!(results[1].index, 1);
}

#[test]
fn unscripted_command_aborts_the_batch() {
    let transport = ScriptedTransport::new().respond("show ip 1", "ip 1 ip-addr : 10.0.0.1\n");
    let mut session = session(transport);
    let items = vec![
        ConfigItem::ip(1, "10.0.0.1", 24, 0),
        ConfigItem::ip(2, "10.0.0.2", 24, 0),
    ];
    let err = session.reconcile_batch(&items, Mode::Apply).unwrap_err();
    // The first item needs a set the script does not cover.
    assert!(matches!(err, CoreError::BatchAborted { ref results, .. } if results.is_empty()));
    assert!(err.is_transport());
}

#[test]
fn items_applied_before_a_lost_session_are_reported() {
    let transport = ScriptedTransport::new()
        .respond("show ip 1", "")
        .respond(
            "show ip 1",
            "ip 1 ip-addr : 10.0.0.1\nip 1 prefix-len : 24\nip 1 vlan : 0\n",
        )
        .respond(
            "set ip 1 ip-addr 10.0.0.1 prefix-len 24 vlan 0",
            "Set done: ip 1",
        )
        .respond("show ip 2", "Connection timed out");
    let mut session = session(transport);
    let items = vec![
        ConfigItem::ip(1, "10.0.0.1", 24, 0),
        ConfigItem::ip(2, "10.0.0.2", 24, 0),
    ];

    let err = session.reconcile_batch(&items, Mode::Apply).unwrap_err();
    assert!(err.is_transport());
    let CoreError::BatchAborted { results, .. } = err else {
        panic!("expected an aborted batch");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].index, 0);
    assert_eq!(results[0].outcome, Outcome::Applied);
    assert!(results[0].changed);
    assert_eq!(
        session.transport().sent(),
        [
            "show ip 1",
            "set ip 1 ip-addr 10.0.0.1 prefix-len 24 vlan 0",
            "show ip 1",
            "show ip 2",
        ]
    );
}

#[test]
fn check_mode_reads_but_never_sets() {
    let mut session = session(ScriptedTransport::new().respond("show ip 3", IP3_OLD));
    let results = session
        .reconcile_batch(&[ConfigItem::ip(3, "192.168.1.100", 24, 0)], Mode::Check)
        .unwrap();
    assert_eq!(results[0].outcome, Outcome::WouldApply);
    assert_eq!(session.transport().sent(), ["show ip 3"]);
}

#[test]
fn rollback_is_armed_and_reread() {
    let transport = ScriptedTransport::new()
        .respond("show rollback", "rollback timeout : not started\n")
        .respond("show rollback", "rollback timeout : 600\n")
        .respond("set rollback timeout 600", "Set done: rollbacktimeout: 600");
    let mut session = session(transport);

    let report = session.set_rollback(RollbackTarget::Present(600), false).unwrap();
    assert!(report.changed);
    assert_eq!(report.timeout, Some(600));
    assert_eq!(report.message, "Rollback activated with 600 second timeout");
    assert_eq!(
        session.transport().sent(),
        ["show rollback", "set rollback timeout 600", "show rollback"]
    );
}

#[test]
fn rollback_clear_requires_exact_marker() {
    let transport = ScriptedTransport::new()
        .respond("show rollback", "rollback timeout : 300\n")
        .respond("clear rollback", "done");
    let mut session = session(transport);
    let report = session.set_rollback(RollbackTarget::Absent, false).unwrap();
    assert!(report.is_failed());
    assert!(!report.changed);
    assert_eq!(report.timeout, Some(300));
}

#[test]
fn gather_all_reads_typed_subsets_only() {
    let transport = ScriptedTransport::new()
        .respond("show system", "system hostname : sw\nsystem description : EH-8010FX\n")
        .respond("show sw", "1 10.8.2 yes no exists\n2 10.6.0 no no missing\n")
        .respond("show ip", IP3_NEW)
        .respond("show route", "")
        .respond("show inventory", "inventory 1 cont-in : 0\n")
        .respond("show rf", "rf operational : up\nrf rssi : -40\n")
        .respond("show rollback", "rollback timeout : not started\n");
    let mut session = session(transport);

    let facts = session.gather(&[FactSubset::All]).unwrap();
    assert_eq!(facts.len(), 7);
    assert!(facts.get(FactSubset::RunningConfig).is_none());
    assert_eq!(
        facts.get(FactSubset::Rollback),
        Some(&Decoded::Rollback(RollbackStatus::INACTIVE))
    );
    let Some(Decoded::Record(rf)) = facts.get(FactSubset::Rf) else {
        panic!("rf should decode to a record");
    };
    assert_eq!(rf.float("rssi"), Some(-40.0));
}

#[test]
fn device_info_combines_system_and_software() {
    let transport = ScriptedTransport::new()
        .respond(
            "show system",
            "system description : EH-8010FX\nsystem hostname : sw\nsystem name : N/A\n",
        )
        .respond("show sw", "1 10.8.2-19409 yes no exists\n");
    let mut session = session(transport);
    let info = session.device_info().unwrap();
    assert_eq!(info.model.as_deref(), Some("EH-8010FX"));
    assert_eq!(info.hostname.as_deref(), Some("sw"));
    assert_eq!(info.name, None);
    assert_eq!(info.version.as_deref(), Some("10.8.2-19409"));
}

#[test]
fn raw_commands_run_in_order() {
    let transport = ScriptedTransport::new()
        .respond("show rf", "rf operational : up")
        .respond("show rollback", "rollback timeout : 60");
    let mut session = session(transport);
    let outputs = session
        .run_commands(&["show rollback".to_owned(), "show rf".to_owned()])
        .unwrap();
    let commands: Vec<&str> = outputs.iter().map(|o| o.command.as_str()).collect();
    assert_eq!(commands, ["show rollback", "show rf"]);
    assert_eq!(outputs[1].output, "rf operational : up");
}
