//! Closed-class word lists and the built-in gazetteer for the English rule model.

use gapforge_core::EntityType;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

pub static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "the", "a", "an", "this", "that", "these", "those", "its", "his", "her", "their", "our",
        "my", "your", "some", "any", "each", "every", "no", "another", "such", "both", "all",
        "several", "many", "most", "few",
    ])
});

pub static PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "at", "in", "on", "of", "for", "with", "by", "from", "to", "into", "onto", "near", "about",
        "across", "against", "among", "around", "after", "before", "behind", "beside", "between",
        "beyond", "during", "inside", "outside", "over", "under", "through", "throughout",
        "toward", "towards", "upon", "within", "without", "via", "since", "per", "alongside",
    ])
});

pub static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "i", "you", "he", "she", "it", "we", "they", "him", "them", "us", "me", "who", "whom",
        "which", "what", "there", "here", "everyone", "someone", "nobody", "one",
    ])
});

pub static RELATIVE_PRONOUNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["who", "which", "that", "whom"]));

pub static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| set(&["and", "or", "nor"]));

/// Words that open a new clause.
pub static SUBORDINATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "but", "because", "although", "though", "while", "whereas", "when", "whenever", "if",
        "unless", "until", "so", "yet", "however", "where",
    ])
});

/// Auxiliaries mapped to their lemma.
pub static AUXILIARIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for w in ["is", "are", "was", "were", "be", "been", "being", "am", "'s"] {
        m.insert(w, "be");
    }
    for w in ["has", "have", "had", "having"] {
        m.insert(w, "have");
    }
    for w in ["do", "does", "did"] {
        m.insert(w, "do");
    }
    for w in ["will", "would", "shall", "should", "can", "could", "may", "might", "must"] {
        m.insert(w, w);
    }
    m
});

pub static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "not", "also", "still", "now", "then", "already", "often", "never", "always", "soon",
        "later", "once", "just", "only", "even", "hard", "well", "again", "together", "there",
        "here", "first", "currently", "recently", "formerly", "previously", "eventually",
        "today", "yesterday", "tomorrow", "very", "too", "much", "more", "less", "further",
    ])
});

/// Capitalized words that open sentences but never name entities.
pub static SENTENCE_OPENERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "however", "meanwhile", "additionally", "furthermore", "moreover", "finally", "later",
        "earlier", "today", "yesterday", "tomorrow", "after", "before", "although", "while",
        "when", "since", "because", "during", "then", "recently", "currently", "also", "in",
        "on", "at", "as", "by", "for", "from", "with", "according", "despite", "unlike",
        "like", "last", "next", "first", "many", "most", "some", "several", "both", "each",
        "every", "all", "if", "unless", "thus", "therefore", "instead", "yes", "no", "overall",
    ])
});

pub static MONTHS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
        "sep", "sept", "oct", "nov", "dec",
    ])
});

pub static WEEKDAYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ])
});

/// Honorifics and role titles that introduce a personal name.
pub static TITLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "dame", "president",
        "senator", "governor", "mayor", "judge", "king", "queen", "prince", "princess",
        "gen", "col", "capt", "captain", "lt", "sgt", "rev", "chancellor", "ambassador",
        "chairman", "ceo",
    ])
});

/// Abbreviations after which a period does not end the sentence.
pub static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "gen", "col", "capt", "lt", "sgt",
        "rev", "vs", "mt", "ft", "no", "fig", "approx", "dept", "univ",
    ])
});

pub static ORG_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "inc", "corp", "corporation", "ltd", "llc", "plc", "co", "company", "group", "gmbh",
        "ag", "sa", "nv", "holdings", "partners", "university", "institute", "college",
        "school", "academy", "bank", "foundation", "agency", "association", "society",
        "laboratories", "labs", "lab", "technologies", "systems", "solutions", "industries",
        "council", "committee", "ministry", "department", "party", "union", "league",
        "organization", "organisation", "commission", "board", "authority", "bureau",
        "network", "studios", "records", "press", "times", "fc", "club",
    ])
});

/// Heads that make an `X of Y` run an organisation (`University of Oxford`).
pub static ORG_HEADS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "university", "institute", "bank", "ministry", "department", "college", "school",
        "academy", "society", "council", "board", "bureau", "office", "church",
    ])
});

pub static EVENT_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "war", "summit", "conference", "olympics", "festival", "revolution", "election",
        "championship", "championships", "cup", "expo", "games", "crisis", "symposium",
        "forum", "massacre", "battle", "pandemic", "award", "awards", "prize", "tournament",
        "series", "congress", "meeting", "convention", "uprising", "strike",
    ])
});

pub static LAW_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "act", "treaty", "law", "constitution", "amendment", "accord", "accords", "agreement",
        "directive", "regulation", "bill", "code", "charter", "protocol", "convention",
        "doctrine", "statute", "ordinance",
    ])
});

pub static FAC_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "airport", "bridge", "tower", "stadium", "station", "building", "museum", "hospital",
        "center", "centre", "hall", "palace", "cathedral", "church", "temple", "mosque",
        "square", "street", "avenue", "road", "highway", "tunnel", "dam", "arena", "library",
        "theatre", "theater", "castle", "port", "harbor", "harbour", "plant", "factory",
        "campus", "laboratory",
    ])
});

pub static LOC_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "river", "mountain", "mountains", "mount", "lake", "ocean", "sea", "valley", "desert",
        "island", "islands", "bay", "peninsula", "forest", "park", "coast", "gulf", "canyon",
        "basin", "region", "plateau", "strait", "channel", "glacier", "hills", "alps",
    ])
});

pub static FIRST_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "alice", "bob", "carol", "charlie", "dave", "david", "eve", "frank", "grace", "heidi",
        "ivan", "judy", "mallory", "oscar", "peggy", "trent", "victor", "walter", "john",
        "jane", "james", "mary", "robert", "patricia", "michael", "linda", "william",
        "elizabeth", "richard", "barbara", "joseph", "susan", "thomas", "jessica", "charles",
        "sarah", "christopher", "karen", "daniel", "nancy", "matthew", "lisa", "anthony",
        "betty", "mark", "margaret", "steven", "sandra", "paul", "ashley", "andrew", "emily",
        "joshua", "donna", "kenneth", "michelle", "kevin", "carol", "brian", "amanda",
        "george", "melissa", "edward", "deborah", "ronald", "stephanie", "timothy", "rebecca",
        "jason", "laura", "jeffrey", "sharon", "ryan", "cynthia", "jacob", "kathleen", "gary",
        "amy", "nicholas", "anna", "eric", "shirley", "jonathan", "angela", "stephen", "helen",
        "larry", "emma", "justin", "olivia", "scott", "sophia", "peter", "maria", "marie",
        "albert", "isaac", "ada", "alan", "tim", "bill", "steve", "elon", "jeff", "larry",
        "sergey", "mark", "satya", "sundar", "marie", "niels", "werner", "max", "erwin",
        "rosalind", "barack", "angela", "emmanuel", "vladimir", "xi", "narendra", "justin",
        "hans", "pierre", "jean", "carlos", "luis", "ana", "juan", "mohammed", "ahmed", "ali",
        "wei", "li", "yuki", "hiroshi", "priya", "raj", "olga", "ivan", "sven", "ingrid",
    ])
});

pub static DEMONYMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "american", "americans", "british", "french", "german", "germans", "italian",
        "italians", "spanish", "chinese", "japanese", "korean", "indian", "indians", "russian",
        "russians", "canadian", "canadians", "mexican", "brazilian", "australian", "european",
        "europeans", "african", "africans", "asian", "asians", "dutch", "swiss", "swedish",
        "norwegian", "danish", "finnish", "polish", "greek", "turkish", "egyptian", "israeli",
        "iranian", "arab", "arabs", "irish", "scottish", "welsh", "english", "christian",
        "christians", "muslim", "muslims", "jewish", "buddhist", "hindu", "catholic",
        "catholics", "protestant", "democrat", "democrats", "republican", "republicans",
        "democratic", "socialist", "socialists", "conservative", "conservatives", "liberal",
        "liberals",
    ])
});

/// Words whose preceding-token position suggests a geopolitical place.
pub static LOCATION_PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&["in", "near", "from", "across", "throughout", "outside", "inside", "to"])
});

/// Built-in gazetteer keyed by lowercased label.
pub static GAZETTEER: Lazy<HashMap<&'static str, EntityType>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for place in [
        "paris", "london", "berlin", "madrid", "rome", "vienna", "amsterdam", "brussels",
        "lisbon", "dublin", "stockholm", "oslo", "copenhagen", "helsinki", "warsaw", "prague",
        "budapest", "athens", "moscow", "istanbul", "cairo", "lagos", "nairobi",
        "johannesburg", "cape town", "tokyo", "kyoto", "osaka", "beijing", "shanghai",
        "hong kong", "seoul", "singapore", "bangkok", "jakarta", "manila", "delhi",
        "new delhi", "mumbai", "bangalore", "sydney", "melbourne", "auckland", "toronto",
        "montreal", "vancouver", "new york", "new york city", "los angeles", "chicago",
        "boston", "san francisco", "seattle", "austin", "washington", "houston", "miami",
        "atlanta", "denver", "mexico city", "sao paulo", "rio de janeiro", "buenos aires",
        "lima", "bogota", "santiago", "geneva", "zurich", "munich", "hamburg", "frankfurt",
        "milan", "barcelona", "lyon", "marseille", "manchester", "edinburgh", "oxford",
        "cambridge", "palo alto", "mountain view", "cupertino", "redmond", "silicon valley",
        "france", "germany", "spain", "italy", "portugal", "ireland", "united kingdom", "uk",
        "england", "scotland", "wales", "netherlands", "belgium", "switzerland", "austria",
        "sweden", "norway", "denmark", "finland", "poland", "greece", "turkey", "russia",
        "ukraine", "china", "japan", "korea", "south korea", "north korea", "india",
        "pakistan", "bangladesh", "indonesia", "vietnam", "thailand", "philippines",
        "australia", "new zealand", "canada", "united states", "usa", "us", "mexico",
        "brazil", "argentina", "chile", "peru", "colombia", "egypt", "nigeria", "kenya",
        "south africa", "ethiopia", "israel", "iran", "iraq", "saudi arabia", "california",
        "texas", "florida", "massachusetts", "bavaria", "quebec", "ontario",
    ] {
        m.insert(place, EntityType::Gpe);
    }
    for region in [
        "europe", "asia", "africa", "north america", "south america", "antarctica", "oceania",
        "middle east", "sahara", "amazon basin", "himalayas", "alps", "mediterranean",
        "atlantic", "pacific", "arctic", "siberia", "scandinavia",
    ] {
        m.insert(region, EntityType::Loc);
    }
    for org in [
        "google", "microsoft", "apple", "amazon", "meta", "facebook", "ibm", "intel", "nvidia",
        "openai", "anthropic", "deepmind", "tesla", "spacex", "samsung", "sony", "toyota",
        "siemens", "nasa", "esa", "cern", "mit", "stanford", "harvard", "un", "united nations",
        "unesco", "who", "nato", "european union", "eu", "imf", "world bank", "fbi", "cia",
        "oracle", "netflix", "uber", "airbnb", "twitter", "reuters", "bbc",
    ] {
        m.insert(org, EntityType::Org);
    }
    for product in [
        "iphone", "ipad", "android", "windows", "linux", "chatgpt", "playstation", "xbox",
        "kindle", "excel",
    ] {
        m.insert(product, EntityType::Product);
    }
    m
});

/// Base forms of verbs the parser and lemmatizer recognise.
pub static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "work", "acquire", "buy", "sell", "found", "establish", "create", "start", "launch",
        "lead", "manage", "run", "own", "join", "leave", "hire", "employ", "fire", "appoint",
        "elect", "visit", "meet", "marry", "live", "move", "relocate", "base", "locate",
        "situate", "headquarter", "open", "close", "build", "design", "develop", "release",
        "publish", "write", "study", "teach", "research", "discover", "invent", "win", "lose",
        "defeat", "beat", "sign", "ratify", "pass", "enact", "invade", "attack", "occupy",
        "govern", "rule", "serve", "represent", "support", "oppose", "fund", "finance",
        "invest", "partner", "collaborate", "compete", "merge", "split", "announce", "report",
        "criticize", "praise", "sue", "accuse", "arrest", "succeed", "replace", "precede",
        "follow", "direct", "produce", "star", "perform", "compose", "paint", "speak", "say",
        "tell", "ask", "help", "use", "make", "take", "give", "get", "see", "know", "find",
        "hold", "host", "organize", "attend", "graduate", "receive", "award", "name", "call",
        "bear", "die", "grow", "become", "remain", "stay", "head", "chair", "advise", "train",
        "coach", "play", "represent", "operate", "supply", "manufacture", "distribute",
        "license", "partner", "sponsor", "donate", "contribute", "influence", "inspire",
        "resign", "retire", "return", "travel", "fly", "drive", "lie", "border", "connect",
        "include", "contain", "involve", "affect", "cause", "prevent", "approve", "reject",
        "ban", "regulate", "investigate", "cover", "describe", "mention", "cite", "plan",
        "want", "try", "hope", "decide", "agree", "continue", "begin", "fail", "manage",
        "propose", "introduce", "expand", "reduce", "increase", "control", "win", "kill",
        "defend", "protect", "explore", "observe", "measure", "analyze", "analyse", "model",
        "predict", "link", "relate", "associate", "combine", "apply", "share", "offer",
        "provide", "deliver", "serve", "treat", "cure", "diagnose", "examine", "test",
        "evaluate", "review", "edit", "translate", "adapt", "modify", "change", "improve",
    ])
});

/// Nouns and adjectives too generic to name a document theme.
pub static THEME_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "thing", "things", "way", "ways", "lot", "kind", "part", "time", "times", "year",
        "years", "day", "days", "people", "person", "other", "others", "new", "old", "many",
        "much", "more", "most", "same", "different", "such", "own", "good", "great", "large",
        "small", "high", "low", "last", "first", "second", "next", "few", "several", "very",
        "also", "well", "just", "only", "even", "than", "then", "into", "over", "under",
        "about", "after", "before", "where", "when", "what", "which", "while", "with",
        "without", "this", "that", "these", "those", "there", "their", "they", "them",
        "from", "have", "been", "being", "were", "will", "would", "could", "should", "might",
        "must", "shall", "upon", "because", "although", "however", "through", "between",
        "among", "including", "according", "based", "located", "called", "known", "named",
    ])
});

pub fn is_closed_class(lower: &str) -> bool {
    DETERMINERS.contains(lower)
        || PREPOSITIONS.contains(lower)
        || PRONOUNS.contains(lower)
        || CONJUNCTIONS.contains(lower)
        || SUBORDINATORS.contains(lower)
        || AUXILIARIES.contains_key(lower)
        || ADVERBS.contains(lower)
}
