//! Records mirrored from the farm-monitoring backend.
//!
//! These are plain data carriers. The backend owns every invariant, so the
//! types are lenient when decoding: missing fields fall back to defaults
//! instead of failing the whole page.

pub mod common;
pub mod equipment;
pub mod event;
pub mod farmer;

// Re-export commonly used items
pub use common::{ErrorResponse, Page, PageRequest};
pub use equipment::{
    ConnectedPump, ConnectedSensor, CreatePumpRequest, CreateSensorRequest, EquipmentStatistics,
    EquipmentStatus, FarmEquipmentReport, MaintenanceRequest, MaintenanceSchedule,
    MaintenanceStatus, SensorType, UpdatePumpRequest, UpdateSensorRequest,
};
pub use event::{
    AcknowledgeEventRequest, DashboardStatistics, EquipmentEvent, EventFilterRequest,
    EventSeverity, EventType,
};
pub use farmer::{
    CreateFarmRequest, CreateFarmerRequest, Farm, Farmer, FarmerStatistics, UpdateFarmRequest,
    UpdateFarmerRequest,
};
