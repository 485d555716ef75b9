//! The replica-side seal: a client's host only changes through `replicate`
//! unless a controller upgrade is in scope.

use mirror_client::{ClientError, ReplicationClient};
use mirror_shared::{
    AuthoringController, CommandHandle, TransactionError, TransactionType,
};
use mirror_test::{Note, ObjectId, ProbeCommand, SetProperty, SpawnObject, ToyWorld};

fn new_client() -> ReplicationClient<ToyWorld> {
    let _ = env_logger::builder().is_test(true).try_init();
    ReplicationClient::new()
}

#[test]
fn sealed_host_rejects_local_mutation() {
    let mut client = new_client();
    let note = Note::handle("a");

    assert_eq!(client.host_mut().execute(&note), Err(ClientError::HostSealed));
    assert_eq!(
        client.host_mut().begin_transaction(TransactionType::Atomic),
        Err(ClientError::HostSealed)
    );
    assert_eq!(
        client.host_mut().end_transaction(true),
        Err(ClientError::HostSealed)
    );
    assert!(client.host().manager().notes().is_empty());
}

#[test]
fn replicate_applies_commands_to_the_shadow() {
    let mut client = new_client();
    let o = ObjectId::new(1);

    let spawn = SpawnObject::new(o).with_property("P", 42).handle();
    client.replicate(&spawn).unwrap();
    assert!(client.host().manager().contains(&o));
    assert_eq!(client.host().manager().property(&o, "P"), Some(42));
}

#[test]
fn replicate_skips_empty_commands() {
    let mut client = new_client();

    let probe = ProbeCommand::new(false);
    let handle: CommandHandle<ToyWorld> = probe.clone();
    client.replicate(&handle).unwrap();
    assert_eq!(probe.executions(), 1);

    let empty = ProbeCommand::new(true);
    let handle: CommandHandle<ToyWorld> = empty.clone();
    client.replicate(&handle).unwrap();
    assert_eq!(empty.executions(), 0);
}

#[test]
fn upgrade_allows_local_authoring_and_drop_restores_the_seal() {
    let mut client = new_client();
    let o = ObjectId::new(1);

    {
        let mut upgrade = client.upgrade_controller(Box::new(AuthoringController::new()));
        upgrade
            .host()
            .execute(&SpawnObject::new(o).with_property("P", 1).handle())
            .unwrap();
    }

    // Authored state persists past the upgrade; the seal is back on.
    assert!(client.host().manager().contains(&o));
    assert_eq!(
        client.host_mut().execute(&Note::handle("a")),
        Err(ClientError::HostSealed)
    );

    // Replication resumes normally.
    client
        .replicate(&SetProperty::new(o, "P", 2).handle())
        .unwrap();
    assert_eq!(client.host().manager().property(&o, "P"), Some(2));
}

#[test]
fn replicating_during_an_upgrade_is_rejected() {
    let mut client = new_client();

    let upgrade = client.upgrade_controller(Box::new(AuthoringController::new()));
    // Leak the scope so its drop never restores the seal.
    std::mem::forget(upgrade);

    assert_eq!(
        client.replicate(&Note::handle("a")),
        Err(ClientError::ReplicateWhileUpgraded)
    );
}

#[test]
fn authoring_transaction_rolls_back_host_state() {
    let mut client = new_client();
    let o = ObjectId::new(1);

    let mut upgrade = client.upgrade_controller(Box::new(AuthoringController::new()));
    let host = upgrade.host();
    host.execute(&SpawnObject::new(o).with_property("P", 1).handle())
        .unwrap();

    host.begin_transaction(TransactionType::Atomic).unwrap();
    host.execute(&SetProperty::new(o, "P", 5).handle()).unwrap();
    assert_eq!(host.manager().property(&o, "P"), Some(5));

    host.end_transaction(false).unwrap();
    assert_eq!(host.manager().property(&o, "P"), Some(1));
}

#[test]
fn authoring_end_with_no_open_transaction_errors() {
    let mut client = new_client();

    let mut upgrade = client.upgrade_controller(Box::new(AuthoringController::new()));
    assert_eq!(
        upgrade.host().end_transaction(true),
        Err(ClientError::Transaction(TransactionError::NoOpenTransaction))
    );
}
