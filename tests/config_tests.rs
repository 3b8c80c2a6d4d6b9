use mathic::data::{load_config, validate_config, DEFAULT_CONFIG_PATH};
use mathic::{Inventory, ModuleType, Rng, StatKind};

#[test]
fn stock_config_file_loads_and_validates() {
    let config = load_config(DEFAULT_CONFIG_PATH).unwrap();
    assert!(!validate_config(&config).has_errors());
    assert_eq!(config.substats.len(), 13);
    assert_eq!(config.module_types.len(), 4);
    assert_eq!(config.slots.len(), 6);
    assert_eq!(config.enhancement_ceiling, 15);
    assert_eq!(config.main_stat_value(ModuleType::Mask, StatKind::Atk), Some(550.0));
}

#[test]
fn stock_config_file_drives_a_full_inventory() {
    let config = load_config(DEFAULT_CONFIG_PATH).unwrap();
    let mut inv = Inventory::new(config).unwrap();
    let mut rng = Rng::new(17);

    let mask = inv
        .create_module(ModuleType::Mask, StatKind::Atk, &mut rng)
        .unwrap();
    inv.create_loadout("file-backed").unwrap();
    inv.assign("file-backed", 1, mask).unwrap();

    while !inv.enhance(mask, &mut rng).unwrap().is_maxed() {}
    assert_eq!(inv.module(mask).unwrap().level, 15);
    assert!(!inv.total_stats("file-backed").unwrap().is_empty());
}
