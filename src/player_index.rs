use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRegistry {
    teams: BTreeMap<String, BTreeSet<String>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, team: &str, player: &str) {
        self.teams
            .entry(team.to_string())
            .or_default()
            .insert(player.to_string());
    }

    pub fn teams(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.teams.iter().map(|(team, names)| (team.as_str(), names))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerSlotIndex {
    slots: HashMap<String, usize>,
    names: Vec<String>,
}

impl PlayerSlotIndex {
    /// Teams in name order, then players in name order, slots from 0.
    /// Names are the identity key, so a player listed under two teams keeps
    /// the first slot it reaches.
    pub fn build(registry: &PlayerRegistry) -> Self {
        let mut out = Self::default();
        for (_, names) in registry.teams() {
            for name in names {
                if out.slots.contains_key(name) {
                    continue;
                }
                out.slots.insert(name.clone(), out.names.len());
                out.names.push(name.clone());
            }
        }
        out
    }

    pub fn slot(&self, player: &str) -> Option<usize> {
        self.slots.get(player).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{PlayerRegistry, PlayerSlotIndex};

    #[test]
    fn slots_follow_team_then_player_order() {
        let mut reg = PlayerRegistry::new();
        reg.register("SAS", "Kawhi Leonard");
        reg.register("GSW", "Stephen Curry");
        reg.register("SAS", "Jonathon Simmons");
        reg.register("GSW", "Kevin Durant");
        reg.register("SAS", "Kawhi Leonard");

        let index = PlayerSlotIndex::build(&reg);
        assert_eq!(
            index.names(),
            ["Kevin Durant", "Stephen Curry", "Jonathon Simmons", "Kawhi Leonard"]
        );
        assert_eq!(index.slot("Kevin Durant"), Some(0));
        assert_eq!(index.slot("Kawhi Leonard"), Some(3));
        assert_eq!(index.slot("Tim Duncan"), None);
    }

    #[test]
    fn registration_order_does_not_change_slots() {
        let pairs = [
            ("BOS", "Al Horford"),
            ("CLE", "LeBron James"),
            ("BOS", "Isaiah Thomas"),
            ("CLE", "Kyrie Irving"),
        ];
        let mut forward = PlayerRegistry::new();
        for (team, name) in pairs {
            forward.register(team, name);
        }
        let mut backward = PlayerRegistry::new();
        for (team, name) in pairs.iter().rev() {
            backward.register(team, name);
        }
        assert_eq!(forward, backward);
        assert_eq!(
            PlayerSlotIndex::build(&forward).names(),
            PlayerSlotIndex::build(&backward).names()
        );
    }

    #[test]
    fn traded_player_gets_one_slot() {
        let mut reg = PlayerRegistry::new();
        reg.register("ATL", "Kyle Korver");
        reg.register("CLE", "Kyle Korver");
        reg.register("CLE", "LeBron James");
        let index = PlayerSlotIndex::build(&reg);
        assert_eq!(index.len(), 2);
        assert_eq!(index.slot("Kyle Korver"), Some(0));
        assert_eq!(index.slot("LeBron James"), Some(1));
        assert_eq!(reg.team_count(), 2);
    }
}
