//! Saved load board filters

use chrono::{DateTime, Utc};
use connectcargo_domain::query::LoadCriteria;
use connectcargo_domain::repository::{FilterPreset, FilterPresetRepository};
use connectcargo_types::{Error, Result};

pub struct PresetService<R> {
    repo: R,
}

impl<R: FilterPresetRepository> PresetService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Save `criteria` as `name`. Saving under an existing name overwrites
    /// that preset and keeps its id.
    pub fn save(
        &self,
        name: &str,
        criteria: &LoadCriteria,
        is_default: bool,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingField("preset name"));
        }
        if criteria.is_unconstrained() {
            return Err(Error::NoActiveFilters);
        }

        let id = match self.repo.find_by_name(name)? {
            Some(existing) => existing.id,
            None => self.repo.next_id()?,
        };
        self.repo.save(&FilterPreset {
            id,
            name: name.to_string(),
            criteria: criteria.clone(),
            is_default,
            created_at: now,
        })?;
        tracing::info!(preset = name, is_default, "filter preset saved");

        let mut message = format!("Preset \"{}\" guardado correctamente", name);
        if is_default {
            message.push_str(". Este preset se usará como filtro predeterminado");
        }
        Ok(message)
    }

    pub fn load(&self, name: &str) -> Result<(LoadCriteria, String)> {
        let preset = self
            .repo
            .find_by_name(name)?
            .ok_or_else(|| Error::NotFound(format!("preset {}", name.trim())))?;
        let message = format!("Preset \"{}\" cargado correctamente", preset.name);
        Ok((preset.criteria, message))
    }

    pub fn delete(&self, name: &str) -> Result<String> {
        if self.repo.remove(name)? {
            Ok(format!("Preset \"{}\" eliminado", name.trim()))
        } else {
            Err(Error::NotFound(format!("preset {}", name.trim())))
        }
    }

    pub fn list(&self) -> Result<Vec<FilterPreset>> {
        self.repo.find_all()
    }

    /// Filters to open the board with when the user gave none
    pub fn default_criteria(&self) -> Result<Option<LoadCriteria>> {
        Ok(self.repo.find_default()?.map(|p| p.criteria))
    }
}
