//! 运行状态字（128）与负载输出字（129）的位掩码表。
//!
//! 判定方式为 `(word & mask) == mask`。掩码并非都是 2 的幂（如 `0x03` 要求
//! bit0 与 bit1 同时置位），沿用控制器文档中的取值，不做修正；所有掩码只在
//! 本模块定义。

/// 状态寄存器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusWord {
    /// 运行状态（寄存器 128）
    Operating,
    /// 负载输出（寄存器 129）
    LoadOutput,
}

impl StatusWord {
    pub const fn address(self) -> u16 {
        match self {
            StatusWord::Operating => 128,
            StatusWord::LoadOutput => 129,
        }
    }

    pub const fn masks(self) -> &'static [(&'static str, u16)] {
        match self {
            StatusWord::Operating => OPERATING_FLAGS,
            StatusWord::LoadOutput => LOAD_OUTPUT_FLAGS,
        }
    }
}

pub mod operating {
    pub const RESERVED_1: u16 = 0x01;
    pub const DEFROST: u16 = 0x02;
    pub const ANTI_FREEZE: u16 = 0x03;
    pub const OIL_RETURN: u16 = 0x04;
    pub const REMOTE_ON_OFF: u16 = 0x05;
    pub const OUTDOOR_UNIT_TEST_MODE: u16 = 0x06;
    pub const HEATING_BY_ROOM_THERMOSTAT: u16 = 0x07;
    pub const COOLING_BY_ROOM_THERMOSTAT: u16 = 0x08;
    pub const SOLAR_ENERGY_SIGNAL: u16 = 0x09;
    pub const WATER_TANK_ANTI_FREEZE: u16 = 0x10;
    pub const SG: u16 = 0x11;
    pub const EUV: u16 = 0x12;
    pub const RESERVED_2: u16 = 0x13;
    pub const REQUEST_SN_CODE: u16 = 0x14;
    pub const REQUEST_SOFTWARE_VERSION: u16 = 0x15;
    pub const REQUEST_OPERATION_PARAMETER: u16 = 0x16;
}

pub mod load_output {
    pub const HEATER_IBH1: u16 = 0x01;
    pub const HEATER_IBH2: u16 = 0x02;
    pub const HEATER_TBH: u16 = 0x03;
    pub const PUMP_I: u16 = 0x04;
    pub const SV1: u16 = 0x05;
    pub const SV2: u16 = 0x06;
    pub const EXTERNAL_PUMP_O: u16 = 0x07;
    pub const RETURN_PUMP_D: u16 = 0x08;
    pub const MIXED_PUMP_C: u16 = 0x09;
    pub const SV3: u16 = 0x10;
    pub const HEAT4: u16 = 0x11;
    pub const SOLAR_PUMP: u16 = 0x12;
    pub const ALARM: u16 = 0x13;
    pub const RUN: u16 = 0x14;
    pub const AUX_HEAT_SOURCE: u16 = 0x15;
    pub const DEFROST: u16 = 0x16;
}

/// 运行状态字的标志表
pub const OPERATING_FLAGS: &[(&str, u16)] = &[
    ("status_reserved_1", operating::RESERVED_1),
    ("status_defrost", operating::DEFROST),
    ("status_anti_freeze", operating::ANTI_FREEZE),
    ("status_oil_return", operating::OIL_RETURN),
    ("status_remote_on_off", operating::REMOTE_ON_OFF),
    ("status_outdoor_unit_test_mode_mark", operating::OUTDOOR_UNIT_TEST_MODE),
    ("status_heating_mode_set_by_room_thermostat", operating::HEATING_BY_ROOM_THERMOSTAT),
    ("status_cooling_mode_set_by_room_thermostat", operating::COOLING_BY_ROOM_THERMOSTAT),
    ("status_solar_energy_signal_input", operating::SOLAR_ENERGY_SIGNAL),
    ("status_anti_freezing_operation_for_water_tank", operating::WATER_TANK_ANTI_FREEZE),
    ("status_sg1", operating::SG),
    ("status_euv1", operating::EUV),
    ("status_reserved_2", operating::RESERVED_2),
    ("status_request_to_send_sn_code", operating::REQUEST_SN_CODE),
    ("status_request_to_send_software_version", operating::REQUEST_SOFTWARE_VERSION),
    ("status_request_to_send_operation_parameter", operating::REQUEST_OPERATION_PARAMETER),
];

/// 负载输出字的标志表
pub const LOAD_OUTPUT_FLAGS: &[(&str, u16)] = &[
    ("load_output_electric_heater_ibh1", load_output::HEATER_IBH1),
    ("load_output_electric_heater_ibh2", load_output::HEATER_IBH2),
    ("load_output_electric_heater_tbh", load_output::HEATER_TBH),
    ("load_output_water_pump_pump_i", load_output::PUMP_I),
    ("load_output_sv1", load_output::SV1),
    ("load_output_sv2", load_output::SV2),
    ("load_output_external_water_pump_p_o", load_output::EXTERNAL_PUMP_O),
    ("load_output_water_return_water_p_d", load_output::RETURN_PUMP_D),
    ("load_output_mixed_water_pump_p_c", load_output::MIXED_PUMP_C),
    ("load_output_sv3", load_output::SV3),
    ("load_output_heat4", load_output::HEAT4),
    ("load_output_solar_water_pump", load_output::SOLAR_PUMP),
    ("load_output_alarm", load_output::ALARM),
    ("load_output_run", load_output::RUN),
    ("load_output_aux_heat_source", load_output::AUX_HEAT_SOURCE),
    ("load_output_defrost", load_output::DEFROST),
];

/// 掩码完全匹配
pub const fn is_set(word: u16, mask: u16) -> bool {
    word & mask == mask
}

pub const fn low_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

pub const fn high_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_flags(word: u16, table: &'static [(&'static str, u16)]) -> Vec<(&'static str, bool)> {
        table
            .iter()
            .map(|(name, mask)| (*name, is_set(word, *mask)))
            .collect()
    }

    #[test]
    fn test_exact_match_on_mask() {
        assert!(is_set(0x03, 0x03));
        assert!(!is_set(0x03, 0x04));
        assert!(is_set(0x03, 0x01));
        assert!(is_set(0x03, 0x02));
        assert!(!is_set(0x02, 0x03));
    }

    #[test]
    fn test_overlapping_masks_are_not_independent() {
        // 0x07 同时满足 0x01..=0x07 中的所有掩码
        let flags = decode_flags(0x07, OPERATING_FLAGS);
        let set: Vec<&str> = flags.iter().filter(|(_, on)| *on).map(|(n, _)| *n).collect();
        assert_eq!(
            set,
            vec![
                "status_reserved_1",
                "status_defrost",
                "status_anti_freeze",
                "status_oil_return",
                "status_remote_on_off",
                "status_outdoor_unit_test_mode_mark",
                "status_heating_mode_set_by_room_thermostat",
            ]
        );
    }

    #[test]
    fn test_hex_masks_above_nine() {
        // 0x10 是 bit4，不是十进制 10
        let flags = decode_flags(0x10, LOAD_OUTPUT_FLAGS);
        let set: Vec<&str> = flags.iter().filter(|(_, on)| *on).map(|(n, _)| *n).collect();
        assert_eq!(set, vec!["load_output_sv3"]);
    }

    #[test]
    fn test_tables_cover_sixteen_flags_each() {
        assert_eq!(StatusWord::Operating.masks().len(), 16);
        assert_eq!(StatusWord::LoadOutput.masks().len(), 16);
        assert_eq!(StatusWord::Operating.address(), 128);
        assert_eq!(StatusWord::LoadOutput.address(), 129);
    }

    #[test]
    fn test_byte_split() {
        assert_eq!(low_byte(0x2D23), 0x23);
        assert_eq!(high_byte(0x2D23), 0x2D);
        assert_eq!(high_byte(0xFF00), 0xFF);
    }
}
