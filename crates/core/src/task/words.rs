//! Slug vocabularies
//!
//! Lowercase ASCII letters only, so every slug matches the task name pattern.

pub(super) const ADJECTIVES: &[&str] = &[
    "able", "agile", "amber", "ancient", "arctic", "azure", "bold", "brave", "breezy", "bright",
    "brisk", "calm", "candid", "cheerful", "clever", "cobalt", "cosmic", "crimson", "crisp",
    "curious", "dapper", "daring", "dazzling", "deft", "eager", "early", "earnest", "electric",
    "elegant", "emerald", "epic", "fair", "fancy", "fearless", "fiery", "fluffy", "fond", "frank",
    "free", "fresh", "friendly", "frosty", "gallant", "gentle", "gifted", "glad", "glossy",
    "golden", "graceful", "grand", "great", "green", "happy", "hardy", "hidden", "honest",
    "humble", "icy", "ideal", "jolly", "jovial", "keen", "kind", "lavish", "lively", "lucky",
    "lunar", "magic", "majestic", "mellow", "merry", "mighty", "misty", "modest", "mystic",
    "nimble", "noble", "olive", "opal", "pastel", "patient", "peaceful", "polar", "polite",
    "proud", "quick", "quiet", "radiant", "rapid", "rare", "ruby", "rustic", "sandy", "scarlet",
    "serene", "sharp", "shiny", "silent", "silver", "sleek", "smart", "snowy", "solar", "spry",
    "steady", "stellar", "stoic", "sunny", "swift", "tidy", "tranquil", "true", "upbeat",
    "vast", "velvet", "vivid", "warm", "wise", "witty", "zealous", "zesty",
];

pub(super) const NOUNS: &[&str] = &[
    "albatross", "alpaca", "antelope", "badger", "beaver", "bison", "bobcat", "buffalo",
    "camel", "caribou", "cheetah", "chipmunk", "cobra", "condor", "cougar", "coyote", "crane",
    "crow", "dingo", "dolphin", "dove", "eagle", "egret", "elk", "falcon", "ferret", "finch",
    "flamingo", "fox", "gazelle", "gecko", "gibbon", "giraffe", "goose", "gorilla", "grouse",
    "hamster", "hare", "hawk", "hedgehog", "heron", "hornet", "hyena", "ibex", "ibis",
    "iguana", "impala", "jackal", "jaguar", "jay", "kangaroo", "kestrel", "kiwi", "koala",
    "lemur", "leopard", "lion", "llama", "lobster", "lynx", "macaw", "magpie", "mammoth",
    "manatee", "marmot", "meerkat", "mink", "mole", "moose", "narwhal", "newt", "ocelot",
    "octopus", "orca", "osprey", "otter", "owl", "panda", "panther", "parrot", "pelican",
    "penguin", "puffin", "puma", "quail", "rabbit", "raccoon", "raven", "reindeer", "robin",
    "salmon", "seal", "shark", "sparrow", "squid", "stork", "swan", "tapir", "tiger",
    "toucan", "trout", "turtle", "viper", "vulture", "walrus", "weasel", "whale", "wolf",
    "wombat", "yak", "zebra",
];
