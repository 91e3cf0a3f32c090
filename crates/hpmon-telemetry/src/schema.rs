use crate::error::TelemetryError;
use crate::status::{load_output, operating, StatusWord};
use crate::value::{FieldKind, FieldValue, SchemaValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 字段解码方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decode {
    /// 单寄存器，补码有符号
    Signed(u16),

    /// 单寄存器，无符号原值
    Unsigned(u16),

    /// 有符号值除以 `divisor`，可选保留小数位
    Scaled {
        address: u16,
        divisor: f64,
        decimals: Option<u32>,
    },

    /// 有符号值除以 `divisor` 后取整（银行家舍入）
    Rounded { address: u16, divisor: f64 },

    /// 寄存器低字节
    LowByte(u16),

    /// 寄存器高字节
    HighByte(u16),

    /// 两个连续寄存器组成的 32 位有符号数
    Wide(u16),

    /// 状态字掩码完全匹配
    Flag(StatusWord, u16),
}

impl Decode {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Decode::Scaled { .. } => FieldKind::Float,
            Decode::Flag(..) => FieldKind::Bool,
            _ => FieldKind::Int,
        }
    }

    pub const fn address(&self) -> u16 {
        match *self {
            Decode::Signed(address)
            | Decode::Unsigned(address)
            | Decode::Scaled { address, .. }
            | Decode::Rounded { address, .. }
            | Decode::LowByte(address)
            | Decode::HighByte(address)
            | Decode::Wide(address) => address,
            Decode::Flag(word, _) => word.address(),
        }
    }

    pub const fn register_count(&self) -> u16 {
        match self {
            Decode::Wide(_) => 2,
            _ => 1,
        }
    }
}

/// 字段描述
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub decode: Decode,
    pub kind: FieldKind,
}

macro_rules! telemetry_schema {
    ($($field:ident: $ty:ty => $decode:expr,)*) => {
        /// 一次采集的遥测快照
        ///
        /// 字段集合与 [`SCHEMA`] 由同一张表生成；反序列化时缺失或为 `null` 的字段取默认值。
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Snapshot {
            pub timestamp: DateTime<Utc>,
            $(
                #[serde(deserialize_with = "null_as_default")]
                pub $field: $ty,
            )*
        }

        /// 字段表，顺序即解析顺序
        pub const SCHEMA: &[FieldSpec] = &[
            $(FieldSpec {
                name: stringify!($field),
                decode: $decode,
                kind: <$ty as SchemaValue>::KIND,
            },)*
        ];

        impl Snapshot {
            pub(crate) fn assign(&mut self, name: &str, value: FieldValue) -> Result<(), TelemetryError> {
                match name {
                    $(stringify!($field) => {
                        self.$field = <$ty as SchemaValue>::from_value(value)
                            .ok_or(TelemetryError::KindMismatch { field: stringify!($field) })?;
                    })*
                    _ => return Err(TelemetryError::UnknownField(name.to_string())),
                }
                Ok(())
            }

            /// 按字段名取值
            pub fn value(&self, name: &str) -> Option<FieldValue> {
                match name {
                    $(stringify!($field) => Some(SchemaValue::to_value(&self.$field)),)*
                    _ => None,
                }
            }
        }
    };
}

/// 旧采集器在读取失败时写入 `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

telemetry_schema! {
    setting_water_temperature_t1s_zone1: i32 => Decode::LowByte(2),
    setting_water_temperature_t1s_zone2: i32 => Decode::HighByte(2),
    operating_frequency_hz: i32 => Decode::Signed(100),
    operating_mode: i32 => Decode::Signed(101),
    fan_speed_rpm: i32 => Decode::Signed(102),
    pmv_openness_p: i32 => Decode::Rounded { address: 103, divisor: 4.8 },
    water_inlet_temp_c: i32 => Decode::Signed(104),
    water_outlet_temp_c: i32 => Decode::Signed(105),
    t3_condenser_temp_c: i32 => Decode::Signed(106),
    t4_ambient_temp_c: i32 => Decode::Signed(107),
    discharge_temp_c: i32 => Decode::Signed(108),
    return_air_temp_c: i32 => Decode::Signed(109),
    t1_total_water_outlet_c: i32 => Decode::Signed(110),
    t1b_water_outlet_after_heater_c: i32 => Decode::Signed(111),
    t2_refrigerant_liquid_c: i32 => Decode::Signed(112),
    t2b_refrigerant_gas_c: i32 => Decode::Signed(113),
    ta_room_temp_c: i32 => Decode::Signed(114),
    t5_water_tank_temp_c: i32 => Decode::Signed(115),
    pressure1_high_kpa: i32 => Decode::Signed(116),
    pressure2_low_kpa: i32 => Decode::Signed(117),
    outdoor_unit_current_a: i32 => Decode::Signed(118),
    outdoor_unit_voltage_v: i32 => Decode::Signed(119),
    tbt1_c: i32 => Decode::Signed(120),
    tbt2_c: i32 => Decode::Signed(121),
    compressor_operation_time_h: i32 => Decode::Signed(122),
    unit_capacity_kw: i32 => Decode::Signed(123),
    current_fault: i32 => Decode::Unsigned(124),
    fault_1: i32 => Decode::Unsigned(125),
    fault_2: i32 => Decode::Unsigned(126),
    fault_3: i32 => Decode::Unsigned(127),
    status_reserved_1: bool => Decode::Flag(StatusWord::Operating, operating::RESERVED_1),
    status_defrost: bool => Decode::Flag(StatusWord::Operating, operating::DEFROST),
    status_anti_freeze: bool => Decode::Flag(StatusWord::Operating, operating::ANTI_FREEZE),
    status_oil_return: bool => Decode::Flag(StatusWord::Operating, operating::OIL_RETURN),
    status_remote_on_off: bool => Decode::Flag(StatusWord::Operating, operating::REMOTE_ON_OFF),
    status_outdoor_unit_test_mode_mark: bool => Decode::Flag(StatusWord::Operating, operating::OUTDOOR_UNIT_TEST_MODE),
    status_heating_mode_set_by_room_thermostat: bool => Decode::Flag(StatusWord::Operating, operating::HEATING_BY_ROOM_THERMOSTAT),
    status_cooling_mode_set_by_room_thermostat: bool => Decode::Flag(StatusWord::Operating, operating::COOLING_BY_ROOM_THERMOSTAT),
    status_solar_energy_signal_input: bool => Decode::Flag(StatusWord::Operating, operating::SOLAR_ENERGY_SIGNAL),
    status_anti_freezing_operation_for_water_tank: bool => Decode::Flag(StatusWord::Operating, operating::WATER_TANK_ANTI_FREEZE),
    status_sg1: bool => Decode::Flag(StatusWord::Operating, operating::SG),
    status_euv1: bool => Decode::Flag(StatusWord::Operating, operating::EUV),
    status_reserved_2: bool => Decode::Flag(StatusWord::Operating, operating::RESERVED_2),
    status_request_to_send_sn_code: bool => Decode::Flag(StatusWord::Operating, operating::REQUEST_SN_CODE),
    status_request_to_send_software_version: bool => Decode::Flag(StatusWord::Operating, operating::REQUEST_SOFTWARE_VERSION),
    status_request_to_send_operation_parameter: bool => Decode::Flag(StatusWord::Operating, operating::REQUEST_OPERATION_PARAMETER),
    load_output_electric_heater_ibh1: bool => Decode::Flag(StatusWord::LoadOutput, load_output::HEATER_IBH1),
    load_output_electric_heater_ibh2: bool => Decode::Flag(StatusWord::LoadOutput, load_output::HEATER_IBH2),
    load_output_electric_heater_tbh: bool => Decode::Flag(StatusWord::LoadOutput, load_output::HEATER_TBH),
    load_output_water_pump_pump_i: bool => Decode::Flag(StatusWord::LoadOutput, load_output::PUMP_I),
    load_output_sv1: bool => Decode::Flag(StatusWord::LoadOutput, load_output::SV1),
    load_output_sv2: bool => Decode::Flag(StatusWord::LoadOutput, load_output::SV2),
    load_output_external_water_pump_p_o: bool => Decode::Flag(StatusWord::LoadOutput, load_output::EXTERNAL_PUMP_O),
    load_output_water_return_water_p_d: bool => Decode::Flag(StatusWord::LoadOutput, load_output::RETURN_PUMP_D),
    load_output_mixed_water_pump_p_c: bool => Decode::Flag(StatusWord::LoadOutput, load_output::MIXED_PUMP_C),
    load_output_sv3: bool => Decode::Flag(StatusWord::LoadOutput, load_output::SV3),
    load_output_heat4: bool => Decode::Flag(StatusWord::LoadOutput, load_output::HEAT4),
    load_output_solar_water_pump: bool => Decode::Flag(StatusWord::LoadOutput, load_output::SOLAR_PUMP),
    load_output_alarm: bool => Decode::Flag(StatusWord::LoadOutput, load_output::ALARM),
    load_output_run: bool => Decode::Flag(StatusWord::LoadOutput, load_output::RUN),
    load_output_aux_heat_source: bool => Decode::Flag(StatusWord::LoadOutput, load_output::AUX_HEAT_SOURCE),
    load_output_defrost: bool => Decode::Flag(StatusWord::LoadOutput, load_output::DEFROST),
    unit_target_frequency_hz: i32 => Decode::Signed(132),
    dc_bus_current_a: i32 => Decode::Signed(133),
    dc_bus_voltage_v: i32 => Decode::Signed(134),
    tf_module_temp_c: i32 => Decode::Signed(135),
    climate_curve_t1s_calculated_value_1: i32 => Decode::Signed(136),
    climate_curve_t1s_calculated_value_2: i32 => Decode::Signed(137),
    water_flow_m3h: f64 => Decode::Scaled { address: 138, divisor: 100.0, decimals: Some(2) },
    limit_scheme_of_outdoor_unit_current: i32 => Decode::Signed(139),
    hydraulic_module_ability_kw: f64 => Decode::Scaled { address: 140, divisor: 100.0, decimals: Some(2) },
    electricity_consumption_kwh: i32 => Decode::Wide(143),
    power_output_kwh: i32 => Decode::Wide(145),
}

const fn check_schema(schema: &[FieldSpec]) {
    let mut i = 0;
    while i < schema.len() {
        assert!(
            schema[i].kind.same_as(schema[i].decode.kind()),
            "snapshot field type does not match its decode kind"
        );
        i += 1;
    }
}

const _: () = check_schema(SCHEMA);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_serialized_keys_match_schema() {
        let json = serde_json::to_value(Snapshot::default()).unwrap();
        let keys: BTreeSet<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        let mut expected: BTreeSet<&str> = SCHEMA.iter().map(|f| f.name).collect();
        expected.insert("timestamp");

        assert_eq!(keys, expected);
        assert_eq!(SCHEMA.len() + 1, keys.len());
    }

    #[test]
    fn test_flag_fields_match_status_tables() {
        for word in [StatusWord::Operating, StatusWord::LoadOutput] {
            for (name, mask) in word.masks() {
                let spec = SCHEMA
                    .iter()
                    .find(|f| f.name == *name)
                    .unwrap_or_else(|| panic!("{} missing from schema", name));
                assert_eq!(spec.decode, Decode::Flag(word, *mask), "{}", name);
            }
        }

        let flag_fields = SCHEMA
            .iter()
            .filter(|f| matches!(f.decode, Decode::Flag(..)))
            .count();
        assert_eq!(flag_fields, 32);
    }

    #[test]
    fn test_decode_addresses() {
        let wide: Vec<u16> = SCHEMA
            .iter()
            .filter(|f| f.decode.register_count() == 2)
            .map(|f| f.decode.address())
            .collect();
        assert_eq!(wide, vec![143, 145]);

        let pmv = SCHEMA.iter().find(|f| f.name == "pmv_openness_p").unwrap();
        assert_eq!(pmv.decode.address(), 103);
        assert_eq!(pmv.kind, FieldKind::Int);
    }

    #[test]
    fn test_missing_keys_default_on_deserialize() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"timestamp": "2025-01-10T08:00:00+00:00", "water_inlet_temp_c": 31}"#,
        )
        .unwrap();
        assert_eq!(snapshot.water_inlet_temp_c, 31);
        assert_eq!(snapshot.power_output_kwh, 0);
        assert!(!snapshot.status_defrost);
    }

    #[test]
    fn test_null_fields_default_on_deserialize() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"timestamp": "2025-01-10T08:00:00+00:00", "fault_2": null,
                "water_flow_m3h": null, "status_defrost": null, "fan_speed_rpm": 540}"#,
        )
        .unwrap();
        assert_eq!(snapshot.fault_2, 0);
        assert_eq!(snapshot.water_flow_m3h, 0.0);
        assert!(!snapshot.status_defrost);
        assert_eq!(snapshot.fan_speed_rpm, 540);
    }

    #[test]
    fn test_value_lookup() {
        let snapshot = Snapshot {
            water_flow_m3h: 0.73,
            status_defrost: true,
            ..Snapshot::default()
        };
        assert_eq!(snapshot.value("water_flow_m3h"), Some(FieldValue::Float(0.73)));
        assert_eq!(snapshot.value("status_defrost"), Some(FieldValue::Bool(true)));
        assert_eq!(snapshot.value("nope"), None);
    }
}
