pub use super::actor_name::Entity as ActorName;
pub use super::sde_jump::Entity as SdeJump;
pub use super::sde_region::Entity as SdeRegion;
pub use super::sde_solar_system::Entity as SdeSolarSystem;
pub use super::sde_type::Entity as SdeType;
pub use super::zkb_killmail::Entity as ZkbKillmail;
