use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::{Error, Result};

/// Screen rectangle in absolute pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check that the region has a size and lies on a screen of the given dimensions
    pub fn validate(&self, name: &str, screen_width: u32, screen_height: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidRegion {
                name: name.to_string(),
                message: "region has zero size".to_string(),
            });
        }
        if self.left < 0
            || self.top < 0
            || self.right() > screen_width as i32
            || self.bottom() > screen_height as i32
        {
            return Err(Error::InvalidRegion {
                name: name.to_string(),
                message: format!(
                    "({}, {}, {}x{}) exceeds screen {}x{}",
                    self.left, self.top, self.width, self.height, screen_width, screen_height
                ),
            });
        }
        Ok(())
    }
}

/// Named screen regions polled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RegionId {
    /// Hit / kill notification area (top right)
    HitKill,
    /// "To Battle!" button (top centre)
    Battle,
    /// Gear / speed HUD (bottom left)
    Gear,
    /// Damaged module list (right edge)
    Modules,
    /// Minimap
    Minimap,
    /// Map name shown on the loading screen
    MapName,
    /// Minimap scale label
    Scale,
    /// Scoreboard / statistics panel title
    Scoreboard,
    /// Main-menu panel title
    MainMenu,
}

impl RegionId {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

const HIT_REGION_SIZE: (u32, u32) = (450, 250);
const BATTLE_REGION_SIZE: (u32, u32) = (200, 65);
const GEAR_REGION_SIZE: (u32, u32) = (250, 100);
const MODULE_REGION_SIZE: (u32, u32) = (200, 300);
const MODULE_OFFSET_DOWN: i32 = 20;

/// Concrete rectangles for every [`RegionId`]
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLayout {
    pub hit_kill: Region,
    pub battle: Region,
    pub gear: Region,
    pub modules: Region,
    pub minimap: Region,
    pub map_name: Region,
    pub scale: Region,
    pub scoreboard: Region,
    pub main_menu: Region,
}

impl RegionLayout {
    /// Derive the HUD regions from the screen size; fixed regions come from settings
    pub fn for_screen(screen_width: u32, screen_height: u32, fixed: &FixedRegions) -> Self {
        let sw = screen_width as i32;
        let sh = screen_height as i32;

        let hit_kill = Region::new(
            sw - HIT_REGION_SIZE.0 as i32,
            0,
            HIT_REGION_SIZE.0,
            HIT_REGION_SIZE.1,
        );
        let battle = Region::new(
            (sw - BATTLE_REGION_SIZE.0 as i32) / 2,
            0,
            BATTLE_REGION_SIZE.0,
            BATTLE_REGION_SIZE.1,
        );
        let gear = Region::new(
            0,
            sh - GEAR_REGION_SIZE.1 as i32,
            GEAR_REGION_SIZE.0,
            GEAR_REGION_SIZE.1,
        );
        let modules = Region::new(
            sw - MODULE_REGION_SIZE.0 as i32,
            hit_kill.bottom() + MODULE_OFFSET_DOWN,
            MODULE_REGION_SIZE.0,
            MODULE_REGION_SIZE.1,
        );

        Self {
            hit_kill,
            battle,
            gear,
            modules,
            minimap: fixed.minimap,
            map_name: fixed.map_name,
            scale: fixed.scale,
            scoreboard: fixed.scoreboard,
            main_menu: fixed.main_menu,
        }
    }

    pub fn get(&self, id: RegionId) -> Region {
        match id {
            RegionId::HitKill => self.hit_kill,
            RegionId::Battle => self.battle,
            RegionId::Gear => self.gear,
            RegionId::Modules => self.modules,
            RegionId::Minimap => self.minimap,
            RegionId::MapName => self.map_name,
            RegionId::Scale => self.scale,
            RegionId::Scoreboard => self.scoreboard,
            RegionId::MainMenu => self.main_menu,
        }
    }

    /// Every region with its id
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, Region)> + '_ {
        RegionId::iter().map(|id| (id, self.get(id)))
    }

    /// Validate every region against the screen size
    pub fn validate(&self, screen_width: u32, screen_height: u32) -> Result<()> {
        for (id, region) in self.regions() {
            region.validate(id.name(), screen_width, screen_height)?;
        }
        Ok(())
    }
}

/// Regions that do not scale with the HUD (calibrated for 1920x1080)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedRegions {
    pub minimap: Region,
    pub map_name: Region,
    pub scale: Region,
    pub scoreboard: Region,
    pub main_menu: Region,
}

impl Default for FixedRegions {
    fn default() -> Self {
        Self {
            minimap: Region::new(1473, 635, 432, 432),
            map_name: Region::new(900, 380, 500, 30),
            scale: Region::new(1707, 1037, 200, 30),
            scoreboard: Region::new(760, 40, 400, 40),
            main_menu: Region::new(760, 200, 400, 50),
        }
    }
}
