//! Shared helpers for mirror integration tests: a toy object manager, toy
//! commands covering every synchronization shape, and a recording observer.


pub use helpers::{
    recording_observer, CascadeSet, Note, ObjectId, ProbeCommand, RecordingObserver, SetProperty,
    SilentCommand, SpawnObject, ToyWorld,
};
