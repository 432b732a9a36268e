//! Pump, sensor, maintenance and equipment-report endpoints.

use crate::api::{segment, ApiClient};
use crate::error::Result;
use crate::models::{
    ConnectedPump, ConnectedSensor, CreatePumpRequest, CreateSensorRequest, EquipmentStatistics,
    FarmEquipmentReport, MaintenanceRequest, MaintenanceSchedule, Page, PageRequest, SensorType,
    UpdatePumpRequest, UpdateSensorRequest,
};

impl ApiClient {
    pub async fn list_pumps(&self, page: PageRequest) -> Result<Page<ConnectedPump>> {
        self.get("/api/pumps", &page.query()).await
    }

    pub async fn get_pump(&self, id: &str) -> Result<ConnectedPump> {
        self.get(&format!("/api/pumps/{}", segment(id)), &[]).await
    }

    pub async fn pumps_by_farm(&self, farm_id: &str) -> Result<Vec<ConnectedPump>> {
        self.get(&format!("/api/pumps/farm/{}", segment(farm_id)), &[]).await
    }

    pub async fn create_pump(&self, request: &CreatePumpRequest) -> Result<ConnectedPump> {
        self.post("/api/pumps", &[], request).await
    }

    pub async fn update_pump(&self, id: &str, request: &UpdatePumpRequest) -> Result<ConnectedPump> {
        self.put(&format!("/api/pumps/{}", segment(id)), request).await
    }

    pub async fn delete_pump(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/pumps/{}", segment(id))).await
    }

    /// Schedule maintenance for a pump; returns the updated pump.
    pub async fn schedule_maintenance(
        &self,
        pump_id: &str,
        request: &MaintenanceRequest,
    ) -> Result<ConnectedPump> {
        self.post(&format!("/api/pumps/{}/maintenance", segment(pump_id)), &[], request)
            .await
    }

    pub async fn list_sensors(&self, page: PageRequest) -> Result<Page<ConnectedSensor>> {
        self.get("/api/sensors", &page.query()).await
    }

    pub async fn get_sensor(&self, id: &str) -> Result<ConnectedSensor> {
        self.get(&format!("/api/sensors/{}", segment(id)), &[]).await
    }

    pub async fn sensors_by_farm(&self, farm_id: &str) -> Result<Vec<ConnectedSensor>> {
        self.get(&format!("/api/sensors/farm/{}", segment(farm_id)), &[]).await
    }

    pub async fn sensors_by_type(&self, sensor_type: SensorType) -> Result<Vec<ConnectedSensor>> {
        self.get(&format!("/api/sensors/type/{}", sensor_type.as_str()), &[])
            .await
    }

    pub async fn create_sensor(&self, request: &CreateSensorRequest) -> Result<ConnectedSensor> {
        self.post("/api/sensors", &[], request).await
    }

    pub async fn update_sensor(
        &self,
        id: &str,
        request: &UpdateSensorRequest,
    ) -> Result<ConnectedSensor> {
        self.put(&format!("/api/sensors/{}", segment(id)), request).await
    }

    pub async fn delete_sensor(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/sensors/{}", segment(id))).await
    }

    pub async fn farm_equipment_report(&self, farm_id: &str) -> Result<FarmEquipmentReport> {
        self.get(&format!("/api/equipment/farm/{}/report", segment(farm_id)), &[])
            .await
    }

    pub async fn maintenance_schedule(&self) -> Result<Vec<MaintenanceSchedule>> {
        self.get("/api/maintenance", &[]).await
    }

    pub async fn equipment_statistics(&self) -> Result<EquipmentStatistics> {
        self.get("/api/equipment/statistics", &[]).await
    }
}
