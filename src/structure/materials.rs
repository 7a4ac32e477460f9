/// Canonical material labels for world blocks and template entries.
///
/// Variants that play the same structural role collapse to one label so a
/// spruce fence satisfies a template asking for `FENCE`. Nether brick fences
/// stay separate from wooden ones.
pub fn normalize_material(raw: &str) -> String {
    let material = raw
        .trim()
        .trim_start_matches("Block{")
        .trim_end_matches('}');
    let material = material
        .rsplit_once(':')
        .map(|(_, path)| path)
        .unwrap_or(material)
        .to_uppercase()
        .replace(' ', "_");

    let canonical = match material.as_str() {
        "CAVE_AIR" | "VOID_AIR" => "AIR",
        "NETHER_BRICK_FENCE" | "NETHER_BRICK_WALL" => "NETHER_BRICK_FENCE",
        "NETHER_BRICKS" => "NETHER_BRICK",
        "STICKY_PISTON" => "PISTON",
        "BLAST_FURNACE" | "SMOKER" => "FURNACE",
        "BRICKS" => "BRICK_BLOCK",
        "CHIPPED_ANVIL" | "DAMAGED_ANVIL" => "ANVIL",
        "SOUL_FIRE" => "FIRE",
        m if m.ends_with("_FENCE") => "FENCE",
        m if m.ends_with("_STAINED_GLASS") => "GLASS",
        m if m.ends_with("_CAULDRON") => "CAULDRON",
        m if m.ends_with("_TRAPDOOR") => "TRAP_DOOR",
        _ => return material,
    };
    canonical.to_string()
}

pub fn is_air(material: &str) -> bool {
    material.is_empty() || material == "AIR"
}
