use crate::league::League;

/// Hand-verified team identity row. `code` is the abbreviation the league
/// feeds use; `logo` is the ESPN CDN slug.
pub struct TeamRow {
    pub name: &'static str,
    pub code: &'static str,
    pub logo: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub aliases: &'static [&'static str],
}

const fn t(
    name: &'static str,
    code: &'static str,
    logo: &'static str,
    primary: &'static str,
    secondary: &'static str,
    aliases: &'static [&'static str],
) -> TeamRow {
    TeamRow {
        name,
        code,
        logo,
        primary,
        secondary,
        aliases,
    }
}

pub const NBA: &[TeamRow] = &[
    t("Atlanta Hawks", "ATL", "atl", "#E03A3E", "#26282A", &[]),
    t("Boston Celtics", "BOS", "bos", "#007A33", "#BA9653", &[]),
    t("Brooklyn Nets", "BKN", "bkn", "#000000", "#FFFFFF", &[]),
    t("Charlotte Hornets", "CHA", "cha", "#1D1160", "#00788C", &[]),
    t("Chicago Bulls", "CHI", "chi", "#CE1141", "#000000", &[]),
    t("Cleveland Cavaliers", "CLE", "cle", "#860038", "#041E42", &["Cleveland Cavs"]),
    t("Dallas Mavericks", "DAL", "dal", "#00538C", "#002B5E", &["Dallas Mavs"]),
    t("Denver Nuggets", "DEN", "den", "#0E2240", "#FEC524", &[]),
    t("Detroit Pistons", "DET", "det", "#C8102E", "#1D42BA", &[]),
    t("Golden State Warriors", "GS", "gs", "#1D428A", "#FFC72C", &["GSW"]),
    t("Houston Rockets", "HOU", "hou", "#CE1141", "#000000", &[]),
    t("Indiana Pacers", "IND", "ind", "#002D62", "#FDBB30", &[]),
    t("LA Clippers", "LAC", "lac", "#C8102E", "#1D428A", &["Los Angeles Clippers"]),
    t("Los Angeles Lakers", "LAL", "lal", "#552583", "#FDB927", &["LA Lakers"]),
    t("Memphis Grizzlies", "MEM", "mem", "#5D76A9", "#12173F", &[]),
    t("Miami Heat", "MIA", "mia", "#98002E", "#F9A01B", &[]),
    t("Milwaukee Bucks", "MIL", "mil", "#00471B", "#EEE1C6", &[]),
    t("Minnesota Timberwolves", "MIN", "min", "#0C2340", "#236192", &[]),
    t("New Orleans Pelicans", "NO", "no", "#0C2340", "#C8102E", &[]),
    t("New York Knicks", "NY", "ny", "#006BB6", "#F58426", &["NY Knicks"]),
    t("Oklahoma City Thunder", "OKC", "okc", "#007AC1", "#EF3B24", &["OKC Thunder"]),
    t("Orlando Magic", "ORL", "orl", "#0077C0", "#C4CED4", &[]),
    t("Philadelphia 76ers", "PHI", "phi", "#006BB6", "#ED174C", &["Philadelphia Sixers"]),
    t("Phoenix Suns", "PHX", "phx", "#1D1160", "#E56020", &[]),
    t("Portland Trail Blazers", "POR", "por", "#E03A3E", "#000000", &[]),
    t("Sacramento Kings", "SAC", "sac", "#5A2D81", "#63727A", &[]),
    t("San Antonio Spurs", "SA", "sa", "#C4CED4", "#000000", &[]),
    t("Toronto Raptors", "TOR", "tor", "#CE1141", "#000000", &[]),
    t("Utah Jazz", "UTAH", "utah", "#002B5C", "#F9A01B", &[]),
    t("Washington Wizards", "WSH", "wsh", "#002B5C", "#E31837", &[]),
];

pub const WNBA: &[TeamRow] = &[
    t("Atlanta Dream", "ATL", "atl", "#E31837", "#5091CD", &[]),
    t("Chicago Sky", "CHI", "chi", "#418FDE", "#FFCD00", &[]),
    t("Connecticut Sun", "CONN", "conn", "#F05023", "#0A2240", &[]),
    t("Dallas Wings", "DAL", "dal", "#002B5C", "#C4D600", &[]),
    t("Golden State Valkyries", "GS", "gs", "#5A2D81", "#000000", &[]),
    t("Indiana Fever", "IND", "ind", "#002D62", "#E03A3E", &[]),
    t("Las Vegas Aces", "LV", "lv", "#000000", "#A7A8AA", &[]),
    t("Los Angeles Sparks", "LA", "la", "#552583", "#FDB927", &["LA Sparks"]),
    t("Minnesota Lynx", "MIN", "min", "#0C2340", "#236192", &[]),
    t("New York Liberty", "NY", "ny", "#86CEBC", "#000000", &["NY Liberty"]),
    t("Phoenix Mercury", "PHX", "phx", "#CB6015", "#1D1160", &[]),
    t("Seattle Storm", "SEA", "sea", "#2C5235", "#FBE122", &[]),
    t("Washington Mystics", "WSH", "wsh", "#0C2340", "#C8102E", &[]),
];

pub const NFL: &[TeamRow] = &[
    t("Arizona Cardinals", "ARI", "ari", "#97233F", "#000000", &[]),
    t("Atlanta Falcons", "ATL", "atl", "#A71930", "#000000", &[]),
    t("Baltimore Ravens", "BAL", "bal", "#241773", "#000000", &[]),
    t("Buffalo Bills", "BUF", "buf", "#00338D", "#C60C30", &[]),
    t("Carolina Panthers", "CAR", "car", "#0085CA", "#101820", &[]),
    t("Chicago Bears", "CHI", "chi", "#0B162A", "#C83803", &[]),
    t("Cincinnati Bengals", "CIN", "cin", "#FB4F14", "#000000", &[]),
    t("Cleveland Browns", "CLE", "cle", "#311D00", "#FF3C00", &[]),
    t("Dallas Cowboys", "DAL", "dal", "#003594", "#869397", &[]),
    t("Denver Broncos", "DEN", "den", "#FB4F14", "#002244", &[]),
    t("Detroit Lions", "DET", "det", "#0076B6", "#B0B7BC", &[]),
    t("Green Bay Packers", "GB", "gb", "#203731", "#FFB612", &[]),
    t("Houston Texans", "HOU", "hou", "#03202F", "#A71930", &[]),
    t("Indianapolis Colts", "IND", "ind", "#002C5F", "#A2AAAD", &[]),
    t("Jacksonville Jaguars", "JAX", "jax", "#006778", "#D7A22A", &[]),
    t("Kansas City Chiefs", "KC", "kc", "#E31837", "#FFB81C", &[]),
    t("Las Vegas Raiders", "LV", "lv", "#000000", "#A5ACAF", &[]),
    t("Los Angeles Chargers", "LAC", "lac", "#0080C6", "#FFC20E", &["LA Chargers"]),
    t("Los Angeles Rams", "LAR", "lar", "#003594", "#FFA300", &["LA Rams"]),
    t("Miami Dolphins", "MIA", "mia", "#008E97", "#FC4C02", &[]),
    t("Minnesota Vikings", "MIN", "min", "#4F2683", "#FFC62F", &[]),
    t("New England Patriots", "NE", "ne", "#002244", "#C60C30", &[]),
    t("New Orleans Saints", "NO", "no", "#D3BC8D", "#101820", &[]),
    t("New York Giants", "NYG", "nyg", "#0B2265", "#A71930", &["NY Giants"]),
    t("New York Jets", "NYJ", "nyj", "#125740", "#000000", &["NY Jets"]),
    t("Philadelphia Eagles", "PHI", "phi", "#004C54", "#A5ACAF", &[]),
    t("Pittsburgh Steelers", "PIT", "pit", "#FFB612", "#101820", &[]),
    t("San Francisco 49ers", "SF", "sf", "#AA0000", "#B3995D", &["SF 49ers"]),
    t("Seattle Seahawks", "SEA", "sea", "#002244", "#69BE28", &[]),
    t("Tampa Bay Buccaneers", "TB", "tb", "#D50A0A", "#34302B", &["Tampa Bay Bucs"]),
    t("Tennessee Titans", "TEN", "ten", "#0C2340", "#4B92DB", &[]),
    t("Washington Commanders", "WSH", "wsh", "#5A1414", "#FFB612", &[]),
];

pub const MLB: &[TeamRow] = &[
    t("Arizona Diamondbacks", "ARI", "ari", "#A71930", "#E3D4AD", &["Arizona D-backs"]),
    t("Atlanta Braves", "ATL", "atl", "#CE1141", "#13274F", &[]),
    t("Baltimore Orioles", "BAL", "bal", "#DF4601", "#000000", &[]),
    t("Boston Red Sox", "BOS", "bos", "#BD3039", "#0C2340", &[]),
    t("Chicago Cubs", "CHC", "chc", "#0E3386", "#CC3433", &[]),
    t("Chicago White Sox", "CHW", "chw", "#27251F", "#C4CED4", &[]),
    t("Cincinnati Reds", "CIN", "cin", "#C6011F", "#000000", &[]),
    t("Cleveland Guardians", "CLE", "cle", "#00385D", "#E50022", &[]),
    t("Colorado Rockies", "COL", "col", "#33006F", "#C4CED4", &[]),
    t("Detroit Tigers", "DET", "det", "#0C2340", "#FA4616", &[]),
    t("Houston Astros", "HOU", "hou", "#002D62", "#EB6E1F", &[]),
    t("Kansas City Royals", "KC", "kc", "#004687", "#BD9B60", &[]),
    t("Los Angeles Angels", "LAA", "laa", "#BA0021", "#003263", &["LA Angels"]),
    t("Los Angeles Dodgers", "LAD", "lad", "#005A9C", "#EF3E42", &["LA Dodgers"]),
    t("Miami Marlins", "MIA", "mia", "#00A3E0", "#EF3340", &[]),
    t("Milwaukee Brewers", "MIL", "mil", "#12284B", "#FFC52F", &[]),
    t("Minnesota Twins", "MIN", "min", "#002B5C", "#D31145", &[]),
    t("New York Mets", "NYM", "nym", "#002D72", "#FF5910", &["NY Mets"]),
    t("New York Yankees", "NYY", "nyy", "#003087", "#E4002C", &["NY Yankees"]),
    t("Athletics", "ATH", "ath", "#003831", "#EFB21E", &["Oakland Athletics", "Oakland A's"]),
    t("Philadelphia Phillies", "PHI", "phi", "#E81828", "#002D72", &[]),
    t("Pittsburgh Pirates", "PIT", "pit", "#27251F", "#FDB827", &[]),
    t("San Diego Padres", "SD", "sd", "#2F241D", "#FFC425", &[]),
    t("San Francisco Giants", "SF", "sf", "#FD5A1E", "#27251F", &["SF Giants"]),
    t("Seattle Mariners", "SEA", "sea", "#0C2C56", "#005C5C", &[]),
    t("St. Louis Cardinals", "STL", "stl", "#C41E3A", "#0C2340", &["Saint Louis Cardinals"]),
    t("Tampa Bay Rays", "TB", "tb", "#092C5C", "#8FBCE6", &[]),
    t("Texas Rangers", "TEX", "tex", "#003278", "#C0111F", &[]),
    t("Toronto Blue Jays", "TOR", "tor", "#134A8E", "#1D2D5C", &[]),
    t("Washington Nationals", "WSH", "wsh", "#AB0003", "#14225A", &[]),
];

pub const NHL: &[TeamRow] = &[
    t("Anaheim Ducks", "ANA", "ana", "#F47A38", "#B9975B", &[]),
    t("Boston Bruins", "BOS", "bos", "#FFB81C", "#000000", &[]),
    t("Buffalo Sabres", "BUF", "buf", "#003087", "#FFB81C", &[]),
    t("Calgary Flames", "CGY", "cgy", "#C8102E", "#F1BE48", &[]),
    t("Carolina Hurricanes", "CAR", "car", "#CE1126", "#000000", &[]),
    t("Chicago Blackhawks", "CHI", "chi", "#CF0A2C", "#000000", &[]),
    t("Colorado Avalanche", "COL", "col", "#6F263D", "#236192", &[]),
    t("Columbus Blue Jackets", "CBJ", "cbj", "#002654", "#CE1126", &[]),
    t("Dallas Stars", "DAL", "dal", "#006847", "#8F8F8C", &[]),
    t("Detroit Red Wings", "DET", "det", "#CE1126", "#FFFFFF", &[]),
    t("Edmonton Oilers", "EDM", "edm", "#041E42", "#FF4C00", &[]),
    t("Florida Panthers", "FLA", "fla", "#041E42", "#C8102E", &[]),
    t("Los Angeles Kings", "LAK", "la", "#111111", "#A2AAAD", &["LA Kings"]),
    t("Minnesota Wild", "MIN", "min", "#154734", "#A6192E", &[]),
    t("Montreal Canadiens", "MTL", "mtl", "#AF1E2D", "#192168", &["Montreal Canadians"]),
    t("Nashville Predators", "NSH", "nsh", "#FFB81C", "#041E42", &[]),
    t("New Jersey Devils", "NJD", "nj", "#CE1126", "#000000", &[]),
    t("New York Islanders", "NYI", "nyi", "#00539B", "#F47D30", &["NY Islanders"]),
    t("New York Rangers", "NYR", "nyr", "#0038A8", "#CE1126", &["NY Rangers"]),
    t("Ottawa Senators", "OTT", "ott", "#C52032", "#C2912C", &[]),
    t("Philadelphia Flyers", "PHI", "phi", "#F74902", "#000000", &[]),
    t("Pittsburgh Penguins", "PIT", "pit", "#000000", "#FCB514", &[]),
    t("San Jose Sharks", "SJS", "sj", "#006D75", "#EA7200", &[]),
    t("Seattle Kraken", "SEA", "sea", "#001628", "#99D9D9", &[]),
    t("St. Louis Blues", "STL", "stl", "#002F87", "#FCB514", &["Saint Louis Blues"]),
    t("Tampa Bay Lightning", "TBL", "tb", "#002868", "#FFFFFF", &[]),
    t("Toronto Maple Leafs", "TOR", "tor", "#00205B", "#FFFFFF", &[]),
    t("Utah Mammoth", "UTA", "utah", "#71AFE5", "#090909", &["Utah Hockey Club"]),
    t("Vancouver Canucks", "VAN", "van", "#00205B", "#00843D", &[]),
    t("Vegas Golden Knights", "VGK", "vgk", "#B4975A", "#333F42", &[]),
    t("Washington Capitals", "WSH", "wsh", "#041E42", "#C8102E", &[]),
    t("Winnipeg Jets", "WPG", "wpg", "#041E42", "#004C97", &[]),
];

// Triple-A clubs resolve their MLB Stats API id at fetch time, so `code` here
// is only the broadcast abbreviation.
pub const TRIPLE_A: &[TeamRow] = &[
    t("Buffalo Bisons", "BUF", "milb-buf", "#002F6C", "#C8102E", &[]),
    t("Columbus Clippers", "COL", "milb-col", "#002D62", "#E31937", &[]),
    t("Durham Bulls", "DUR", "milb-dur", "#00325B", "#F47321", &[]),
    t("Indianapolis Indians", "IND", "milb-ind", "#D31145", "#0C2340", &[]),
    t("Iowa Cubs", "IOW", "milb-iow", "#CC3433", "#0E3386", &["I-Cubs"]),
    t("Las Vegas Aviators", "LV", "milb-lv", "#000000", "#B8A369", &[]),
    t("Oklahoma City Comets", "OKC", "milb-okc", "#005596", "#EF3E42", &[]),
    t("Round Rock Express", "RR", "milb-rr", "#A5192E", "#000000", &[]),
    t("Sacramento River Cats", "SAC", "milb-sac", "#00594F", "#C1A875", &[]),
    t("Scranton/Wilkes-Barre RailRiders", "SWB", "milb-swb", "#0C2340", "#C4CED4", &[
        "Scranton Wilkes-Barre RailRiders",
    ]),
    t("Syracuse Mets", "SYR", "milb-syr", "#002D72", "#FF5910", &[]),
    t("Toledo Mud Hens", "TOL", "milb-tol", "#0C2340", "#D31145", &[]),
];

pub const AHL: &[TeamRow] = &[
    t("Ontario Reign", "ONT", "ahl-ont", "#000000", "#A2AAAD", &[]),
    t("Hershey Bears", "HER", "ahl-her", "#4F2C1D", "#C8A96E", &[]),
    t("Coachella Valley Firebirds", "CV", "ahl-cv", "#A6192E", "#001E62", &[]),
    t("Providence Bruins", "PRO", "ahl-pro", "#FFB81C", "#000000", &[]),
];

pub const TABLES: &[(League, &[TeamRow])] = &[
    (League::Nba, NBA),
    (League::Wnba, WNBA),
    (League::Nfl, NFL),
    (League::Mlb, MLB),
    (League::Nhl, NHL),
    (League::TripleA, TRIPLE_A),
    (League::Ahl, AHL),
];

pub fn logo_url(league: League, slug: &str) -> String {
    let path = match league {
        League::Nba => "nba",
        League::Wnba => "wnba",
        League::Nfl => "nfl",
        League::Mlb => "mlb",
        League::Nhl => "nhl",
        League::NcaaFootball | League::NcaaMensBasketball | League::NcaaWomensBasketball => "ncaa",
        League::Mls | League::Nwsl | League::PremierLeague | League::Usl => "soccer",
        League::TripleA | League::DoubleA | League::HighA | League::SingleA => "milb",
        League::GLeague => "nba-g-league",
        League::Ahl => "ahl",
    };
    format!("https://a.espncdn.com/i/teamlogos/{path}/500/{slug}.png")
}
