use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    Nba,
    Wnba,
    Nfl,
    Mlb,
    Nhl,
    Mls,
    Nwsl,
    PremierLeague,
    TripleA,
    DoubleA,
    HighA,
    SingleA,
    GLeague,
    Ahl,
    Usl,
    NcaaFootball,
    NcaaMensBasketball,
    NcaaWomensBasketball,
}

/// Ranking bucket used when several teams match the same name fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LeagueTier {
    Other = 0,
    Minor = 1,
    Major = 2,
}

/// Which external roster feed serves a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFamily {
    Espn {
        sport: &'static str,
        league: &'static str,
    },
    MlbStats {
        sport_id: u32,
    },
    Nhl,
    Unsupported,
}

impl League {
    pub const ALL: [League; 18] = [
        League::Nba,
        League::Wnba,
        League::Nfl,
        League::Mlb,
        League::Nhl,
        League::Mls,
        League::Nwsl,
        League::PremierLeague,
        League::TripleA,
        League::DoubleA,
        League::HighA,
        League::SingleA,
        League::GLeague,
        League::Ahl,
        League::Usl,
        League::NcaaFootball,
        League::NcaaMensBasketball,
        League::NcaaWomensBasketball,
    ];

    pub fn code(self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Wnba => "WNBA",
            League::Nfl => "NFL",
            League::Mlb => "MLB",
            League::Nhl => "NHL",
            League::Mls => "MLS",
            League::Nwsl => "NWSL",
            League::PremierLeague => "EPL",
            League::TripleA => "AAA",
            League::DoubleA => "AA",
            League::HighA => "HIGH-A",
            League::SingleA => "SINGLE-A",
            League::GLeague => "G-LEAGUE",
            League::Ahl => "AHL",
            League::Usl => "USL",
            League::NcaaFootball => "NCAAF",
            League::NcaaMensBasketball => "NCAAM",
            League::NcaaWomensBasketball => "NCAAW",
        }
    }

    pub fn sport(self) -> &'static str {
        match self {
            League::Nba
            | League::Wnba
            | League::GLeague
            | League::NcaaMensBasketball
            | League::NcaaWomensBasketball => "Basketball",
            League::Nfl | League::NcaaFootball => "Football",
            League::Mlb | League::TripleA | League::DoubleA | League::HighA | League::SingleA => {
                "Baseball"
            }
            League::Nhl | League::Ahl => "Ice Hockey",
            League::Mls | League::Nwsl | League::PremierLeague | League::Usl => "Soccer",
        }
    }

    pub fn tier(self) -> LeagueTier {
        match self {
            League::Nba
            | League::Wnba
            | League::Nfl
            | League::Mlb
            | League::Nhl
            | League::Mls
            | League::Nwsl
            | League::PremierLeague => LeagueTier::Major,
            League::TripleA
            | League::DoubleA
            | League::HighA
            | League::SingleA
            | League::GLeague
            | League::Ahl
            | League::Usl => LeagueTier::Minor,
            League::NcaaFootball | League::NcaaMensBasketball | League::NcaaWomensBasketball => {
                LeagueTier::Other
            }
        }
    }

    pub fn feed(self) -> FeedFamily {
        match self {
            League::Nba => espn("basketball", "nba"),
            League::Wnba => espn("basketball", "wnba"),
            League::Nfl => espn("football", "nfl"),
            League::Mlb => espn("baseball", "mlb"),
            League::Mls => espn("soccer", "usa.1"),
            League::Nwsl => espn("soccer", "usa.nwsl"),
            League::PremierLeague => espn("soccer", "eng.1"),
            League::Usl => espn("soccer", "usa.usl.1"),
            League::NcaaFootball => espn("football", "college-football"),
            League::NcaaMensBasketball => espn("basketball", "mens-college-basketball"),
            League::NcaaWomensBasketball => espn("basketball", "womens-college-basketball"),
            League::TripleA => FeedFamily::MlbStats { sport_id: 11 },
            League::DoubleA => FeedFamily::MlbStats { sport_id: 12 },
            League::HighA => FeedFamily::MlbStats { sport_id: 13 },
            League::SingleA => FeedFamily::MlbStats { sport_id: 14 },
            League::Nhl => FeedFamily::Nhl,
            League::GLeague | League::Ahl => FeedFamily::Unsupported,
        }
    }

    /// Parses a loosely written league hint ("nba", "Triple-A", "Premier League").
    pub fn from_hint(raw: &str) -> Option<League> {
        let key: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let league = match key.as_str() {
            "nba" => League::Nba,
            "wnba" => League::Wnba,
            "nfl" => League::Nfl,
            "mlb" => League::Mlb,
            "nhl" => League::Nhl,
            "mls" => League::Mls,
            "nwsl" => League::Nwsl,
            "epl" | "premierleague" | "englishpremierleague" => League::PremierLeague,
            "aaa" | "triplea" | "milb" | "internationalleague" | "pacificcoastleague" => {
                League::TripleA
            }
            "aa" | "doublea" => League::DoubleA,
            "higha" | "advanceda" => League::HighA,
            "singlea" | "a" | "lowa" => League::SingleA,
            "gleague" | "nbagleague" => League::GLeague,
            "ahl" => League::Ahl,
            "usl" | "uslchampionship" => League::Usl,
            "ncaaf" | "collegefootball" | "cfb" => League::NcaaFootball,
            "ncaam" | "ncaab" | "menscollegebasketball" | "collegebasketball" => {
                League::NcaaMensBasketball
            }
            "ncaaw" | "womenscollegebasketball" => League::NcaaWomensBasketball,
            _ => return None,
        };
        Some(league)
    }
}

const fn espn(sport: &'static str, league: &'static str) -> FeedFamily {
    FeedFamily::Espn { sport, league }
}
