/// Heuristic multiblock classifier.
///
/// Tallies canonical materials around a point and scores each registered
/// multiblock template with a penalty/bonus model. Adjacent structures can
/// produce false positives; the threshold and bonuses separate templates
/// that share common blocks.
use std::collections::HashMap;
use tracing::debug;

use crate::config::DetectionConfig;
use crate::gui::WorldView;
use crate::machine::{MachineDescriptor, MachineRegistry, StructureBlock};
use crate::structure::materials::{is_air, normalize_material};
use crate::structure::signature::SignatureTable;
use crate::types::BlockPos;

const DISPENSER: &str = "DISPENSER";

/// Material -> block count
pub type MaterialTally = HashMap<String, u32>;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub machine_id: String,
    pub display_name: String,
    pub confidence: f64,
    /// Dispenser closest to the scan center, if any was seen
    pub dispenser_pos: Option<BlockPos>,
}

/// What one scan of the neighborhood found
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub materials: MaterialTally,
    pub dispensers: Vec<BlockPos>,
}

impl ScanResult {
    pub fn nearest_dispenser(&self, center: BlockPos) -> Option<BlockPos> {
        self.dispensers
            .iter()
            .copied()
            .min_by_key(|pos| (pos.distance_squared(&center), *pos))
    }
}

/// Score breakdown for one template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    pub matched: u32,
    pub total: u32,
    pub excess: u32,
    pub missing: u32,
    pub score: f64,
}

pub fn template_tally(structure: &[StructureBlock]) -> MaterialTally {
    let mut tally = MaterialTally::new();
    for block in structure {
        let material = normalize_material(&block.material);
        if !is_air(&material) {
            *tally.entry(material).or_insert(0) += 1;
        }
    }
    tally
}

#[derive(Debug, Clone, Default)]
pub struct StructureMatcher {
    config: DetectionConfig,
    signatures: SignatureTable,
}

impl StructureMatcher {
    pub fn new(config: DetectionConfig, signatures: SignatureTable) -> Self {
        Self { config, signatures }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn signatures(&self) -> &SignatureTable {
        &self.signatures
    }

    /// Tally non-air blocks within the scan radius of `center`
    pub fn scan<W: WorldView + ?Sized>(&self, world: &W, center: BlockPos) -> ScanResult {
        let mut result = ScanResult::default();
        for (pos, block) in world.scan_blocks(center, self.config.scan_radius) {
            let material = normalize_material(&block);
            if is_air(&material) {
                continue;
            }
            if material == DISPENSER {
                result.dispensers.push(pos);
            }
            *result.materials.entry(material).or_insert(0) += 1;
        }
        result
    }

    /// Score one template against what was found.
    ///
    /// Only template materials count toward excess; unrelated terrain is
    /// ignored. The result is clamped to `[0, 1]`.
    pub fn score_template(
        &self,
        required: &MaterialTally,
        found: &MaterialTally,
        signature: Option<&[String]>,
    ) -> TemplateScore {
        let mut matched = 0;
        let mut total = 0;
        let mut excess = 0;
        let mut missing = 0;

        for (material, &needed) in required {
            let have = found.get(material).copied().unwrap_or(0);
            matched += needed.min(have);
            total += needed;
            excess += have.saturating_sub(needed);
            missing += needed.saturating_sub(have);
        }

        if total == 0 {
            return TemplateScore {
                matched,
                total,
                excess,
                missing,
                score: 0.0,
            };
        }

        let cfg = &self.config;
        let mut score = f64::from(matched) / f64::from(total)
            - (cfg.excess_penalty_step * f64::from(excess)).min(cfg.excess_penalty_cap)
            - (cfg.missing_penalty_step * f64::from(missing)).min(cfg.missing_penalty_cap);

        if matched == total && excess == 0 {
            score += cfg.exact_match_bonus;
        }

        let signature_present = signature.is_some_and(|set| {
            !set.is_empty() && set.iter().all(|m| found.get(m).copied().unwrap_or(0) > 0)
        });
        if signature_present {
            score += cfg.signature_bonus;
        }

        TemplateScore {
            matched,
            total,
            excess,
            missing,
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Best multiblock template around `center`, or `None` when no template
    /// reaches the confidence threshold. Earlier registered templates win
    /// ties.
    pub fn detect<W: WorldView + ?Sized>(
        &self,
        world: &W,
        center: BlockPos,
        machines: &MachineRegistry,
    ) -> Option<DetectionResult> {
        let scan = self.scan(world, center);
        if scan.materials.is_empty() {
            debug!("Nothing to classify around {}", center);
            return None;
        }

        let mut best: Option<(&MachineDescriptor, f64)> = None;
        for machine in machines.iter() {
            let MachineDescriptor::Multiblock { id, structure, .. } = machine else {
                continue;
            };

            let required = template_tally(structure);
            let result = self.score_template(&required, &scan.materials, self.signatures.signature(id));
            debug!(
                "Template {}: score {:.3} (matched {}/{}, excess {}, missing {})",
                id, result.score, result.matched, result.total, result.excess, result.missing
            );

            if result.score < self.config.min_confidence {
                continue;
            }
            if best.map_or(true, |(_, best_score)| result.score > best_score) {
                best = Some((machine, result.score));
            }
        }

        let (machine, confidence) = best?;
        debug!(
            "Detected {} at {} with confidence {:.2}",
            machine.id(),
            center,
            confidence
        );
        Some(DetectionResult {
            machine_id: machine.id().to_string(),
            display_name: machine.display_name().to_string(),
            confidence,
            dispenser_pos: scan.nearest_dispenser(center),
        })
    }
}
