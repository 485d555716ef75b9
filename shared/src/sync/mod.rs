mod command_synchronizer;
mod pending_update_map;


pub use command_synchronizer::CommandSynchronizer;
pub use pending_update_map::PendingUpdateMap;
