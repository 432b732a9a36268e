//! Pump, sensor and maintenance queries.

use super::{Resources, EQUIPMENT_KEY, MAINTENANCE_KEY, PUMPS_KEY, SENSORS_KEY};
use crate::error::Result;
use crate::models::{
    ConnectedPump, ConnectedSensor, CreatePumpRequest, CreateSensorRequest, EquipmentStatistics,
    FarmEquipmentReport, MaintenanceRequest, MaintenanceSchedule, Page, PageRequest, SensorType,
    UpdatePumpRequest, UpdateSensorRequest,
};
use crate::query::QueryState;
use crate::query_key;

impl Resources {
    pub async fn pumps(&self, page: PageRequest) -> QueryState<Page<ConnectedPump>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![PUMPS_KEY, page.page, page.size], true, move || async move {
                api.list_pumps(page).await
            })
            .await
    }

    pub async fn pump(&self, id: &str) -> QueryState<ConnectedPump> {
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .query(query_key![PUMPS_KEY, &id], !id.is_empty(), move || async move {
                api.get_pump(&id).await
            })
            .await
    }

    pub async fn pumps_by_farm(&self, farm_id: &str) -> QueryState<Vec<ConnectedPump>> {
        let api = self.api.clone();
        let farm_id = farm_id.to_string();
        self.cache
            .query(query_key![PUMPS_KEY, "farm", &farm_id], !farm_id.is_empty(), move || async move {
                api.pumps_by_farm(&farm_id).await
            })
            .await
    }

    pub async fn create_pump(&self, request: &CreatePumpRequest) -> Result<ConnectedPump> {
        let result = self.api.create_pump(request).await;
        self.settle(
            result,
            &[query_key![PUMPS_KEY], query_key![EQUIPMENT_KEY]],
            "Pump created successfully",
            "Failed to create pump",
        )
    }

    pub async fn update_pump(&self, id: &str, request: &UpdatePumpRequest) -> Result<ConnectedPump> {
        let result = self.api.update_pump(id, request).await;
        self.settle(
            result,
            &[
                query_key![PUMPS_KEY],
                query_key![PUMPS_KEY, id],
                query_key![EQUIPMENT_KEY],
            ],
            "Pump updated successfully",
            "Failed to update pump",
        )
    }

    pub async fn delete_pump(&self, id: &str) -> Result<()> {
        let result = self.api.delete_pump(id).await;
        self.settle(
            result,
            &[query_key![PUMPS_KEY], query_key![EQUIPMENT_KEY]],
            "Pump deleted successfully",
            "Failed to delete pump",
        )
    }

    pub async fn schedule_maintenance(
        &self,
        pump_id: &str,
        request: &MaintenanceRequest,
    ) -> Result<ConnectedPump> {
        let result = self.api.schedule_maintenance(pump_id, request).await;
        self.settle(
            result,
            &[query_key![PUMPS_KEY, pump_id], query_key![PUMPS_KEY]],
            "Maintenance scheduled successfully",
            "Failed to schedule maintenance",
        )
    }

    pub async fn sensors(&self, page: PageRequest) -> QueryState<Page<ConnectedSensor>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![SENSORS_KEY, page.page, page.size], true, move || async move {
                api.list_sensors(page).await
            })
            .await
    }

    pub async fn sensor(&self, id: &str) -> QueryState<ConnectedSensor> {
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .query(query_key![SENSORS_KEY, &id], !id.is_empty(), move || async move {
                api.get_sensor(&id).await
            })
            .await
    }

    pub async fn sensors_by_farm(&self, farm_id: &str) -> QueryState<Vec<ConnectedSensor>> {
        let api = self.api.clone();
        let farm_id = farm_id.to_string();
        self.cache
            .query(
                query_key![SENSORS_KEY, "farm", &farm_id],
                !farm_id.is_empty(),
                move || async move { api.sensors_by_farm(&farm_id).await },
            )
            .await
    }

    pub async fn sensors_by_type(&self, sensor_type: SensorType) -> QueryState<Vec<ConnectedSensor>> {
        let api = self.api.clone();
        self.cache
            .query(
                query_key![SENSORS_KEY, "type", sensor_type.as_str()],
                true,
                move || async move { api.sensors_by_type(sensor_type).await },
            )
            .await
    }

    pub async fn create_sensor(&self, request: &CreateSensorRequest) -> Result<ConnectedSensor> {
        let result = self.api.create_sensor(request).await;
        self.settle(
            result,
            &[query_key![SENSORS_KEY], query_key![EQUIPMENT_KEY]],
            "Sensor created successfully",
            "Failed to create sensor",
        )
    }

    pub async fn update_sensor(
        &self,
        id: &str,
        request: &UpdateSensorRequest,
    ) -> Result<ConnectedSensor> {
        let result = self.api.update_sensor(id, request).await;
        self.settle(
            result,
            &[
                query_key![SENSORS_KEY],
                query_key![SENSORS_KEY, id],
                query_key![EQUIPMENT_KEY],
            ],
            "Sensor updated successfully",
            "Failed to update sensor",
        )
    }

    pub async fn delete_sensor(&self, id: &str) -> Result<()> {
        let result = self.api.delete_sensor(id).await;
        self.settle(
            result,
            &[query_key![SENSORS_KEY], query_key![EQUIPMENT_KEY]],
            "Sensor deleted successfully",
            "Failed to delete sensor",
        )
    }

    pub async fn farm_equipment_report(&self, farm_id: &str) -> QueryState<FarmEquipmentReport> {
        let api = self.api.clone();
        let farm_id = farm_id.to_string();
        self.cache
            .query(
                query_key![EQUIPMENT_KEY, "report", &farm_id],
                !farm_id.is_empty(),
                move || async move { api.farm_equipment_report(&farm_id).await },
            )
            .await
    }

    pub async fn maintenance_schedule(&self) -> QueryState<Vec<MaintenanceSchedule>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![MAINTENANCE_KEY, "schedule"], true, move || async move {
                api.maintenance_schedule().await
            })
            .await
    }

    pub async fn equipment_statistics(&self) -> QueryState<EquipmentStatistics> {
        let api = self.api.clone();
        self.cache
            .query(query_key![EQUIPMENT_KEY, "statistics"], true, move || async move {
                api.equipment_statistics().await
            })
            .await
    }
}
