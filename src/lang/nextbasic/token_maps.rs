//! Token table for NextBASIC
//!
//! Every keyword the interpreter stores as a single byte, codes 135 through 255.
//! Keywords with an internal space (`GO TO`, `DEF FN`, `OPEN #`) are written here the way
//! they are listed; when tokenizing, the space matches any amount of whitespace including none.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Lowest byte that is a keyword token
pub const FIRST_TOKEN: u8 = 135;

pub const TOKENS: [(u8,&str);121] = [
    (135,"PEEK$"), (136,"REG"), (137,"DPOKE"), (138,"DPEEK"), (139,"MOD"), (140,"<<"), (141,">>"),
    (142,"UNTIL"), (143,"ERROR"), (144,"ON"), (145,"DEFPROC"), (146,"ENDPROC"), (147,"PROC"),
    (148,"LOCAL"), (149,"DRIVER"), (150,"WHILE"), (151,"REPEAT"), (152,"ELSE"), (153,"REMOUNT"),
    (154,"BANK"), (155,"TILE"), (156,"LAYER"), (157,"PALETTE"), (158,"SPRITE"), (159,"PWD"),
    (160,"CD"), (161,"MKDIR"), (162,"RMDIR"), (163,"SPECTRUM"), (164,"PLAY"), (165,"RND"),
    (166,"INKEY$"), (167,"PI"), (168,"FN"), (169,"POINT"), (170,"SCREEN$"), (171,"ATTR"),
    (172,"AT"), (173,"TAB"), (174,"VAL$"), (175,"CODE"), (176,"VAL"), (177,"LEN"), (178,"SIN"),
    (179,"COS"), (180,"TAN"), (181,"ASN"), (182,"ACS"), (183,"ATN"), (184,"LN"), (185,"EXP"),
    (186,"INT"), (187,"SQR"), (188,"SGN"), (189,"ABS"), (190,"PEEK"), (191,"IN"), (192,"USR"),
    (193,"STR$"), (194,"CHR$"), (195,"NOT"), (196,"BIN"), (197,"OR"), (198,"AND"), (199,"<="),
    (200,">="), (201,"<>"), (202,"LINE"), (203,"THEN"), (204,"TO"), (205,"STEP"), (206,"DEF FN"),
    (207,"CAT"), (208,"FORMAT"), (209,"MOVE"), (210,"ERASE"), (211,"OPEN #"), (212,"CLOSE #"),
    (213,"MERGE"), (214,"VERIFY"), (215,"BEEP"), (216,"CIRCLE"), (217,"INK"), (218,"PAPER"),
    (219,"FLASH"), (220,"BRIGHT"), (221,"INVERSE"), (222,"OVER"), (223,"OUT"), (224,"LPRINT"),
    (225,"LLIST"), (226,"STOP"), (227,"READ"), (228,"DATA"), (229,"RESTORE"), (230,"NEW"),
    (231,"BORDER"), (232,"CONTINUE"), (233,"DIM"), (234,"REM"), (235,"FOR"), (236,"GO TO"),
    (237,"GO SUB"), (238,"INPUT"), (239,"LOAD"), (240,"LIST"), (241,"LET"), (242,"PAUSE"),
    (243,"NEXT"), (244,"POKE"), (245,"PRINT"), (246,"PLOT"), (247,"RUN"), (248,"SAVE"),
    (249,"RANDOMIZE"), (250,"IF"), (251,"CLS"), (252,"DRAW"), (253,"CLEAR"), (254,"RETURN"),
    (255,"COPY")
];

/// Keywords that get a space in front when listed, if not already at a separator.
const LEADING_SPACE: [&str;9] = ["MOD","ON","IN","NOT","OR","AND","THEN","TO","STEP"];

static TABLE: LazyLock<TokenTable> = LazyLock::new(TokenTable::build);

/// Bidirectional keyword map, built once.
pub struct TokenTable {
    detok: HashMap<u8,&'static str>,
    tok: HashMap<String,u8>,
    /// keywords bucketed by their first (upper case) byte, longest first
    index: HashMap<u8,Vec<(&'static [u8],u8)>>
}

impl TokenTable {
    fn build() -> Self {
        let mut detok = HashMap::new();
        let mut tok = HashMap::new();
        let mut index: HashMap<u8,Vec<(&'static [u8],u8)>> = HashMap::new();
        for (code,kw) in TOKENS {
            assert!(code >= FIRST_TOKEN,"token {} below token range",kw);
            assert!(detok.insert(code,kw).is_none(),"token code {} assigned twice",code);
            assert!(tok.insert(kw.to_string(),code).is_none(),"keyword {} assigned twice",kw);
            index.entry(kw.as_bytes()[0]).or_default().push((kw.as_bytes(),code));
        }
        for bucket in index.values_mut() {
            bucket.sort_by(|a,b| b.0.len().cmp(&a.0.len()));
        }
        Self { detok, tok, index }
    }
    /// Shared instance
    pub fn get() -> &'static TokenTable {
        &TABLE
    }
    /// keyword for a token byte, if any
    pub fn decode(&self,code: u8) -> Option<&'static str> {
        self.detok.get(&code).copied()
    }
    /// token byte for a keyword, case insensitive, internal spaces as listed
    pub fn encode(&self,keyword: &str) -> Option<u8> {
        self.tok.get(&keyword.to_uppercase()).copied()
    }
    /// Find the longest keyword starting at `text[pos]`.
    /// Returns the token and the index just past the match.
    pub fn longest_match(&self,text: &[u8],pos: usize) -> Option<(u8,usize)> {
        if pos >= text.len() {
            return None;
        }
        let bucket = self.index.get(&text[pos].to_ascii_uppercase())?;
        if text[pos].is_ascii_alphabetic() && pos > 0 && is_ident_byte(text[pos-1]) {
            return None;
        }
        for (kw,code) in bucket {
            if let Some(end) = match_keyword(kw,text,pos) {
                let last = kw[kw.len()-1];
                let is_fn = *code==self.tok["FN"] || *code==self.tok["DEF FN"];
                let attached = is_fn && fn_name_follows(text,end);
                if last.is_ascii_alphabetic() && !attached && end < text.len() && is_ident_byte(text[end]) {
                    continue;
                }
                return Some((*code,end));
            }
        }
        None
    }
}

/// Bytes that can be part of an identifier
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b==b'_'
}

/// True if a one letter function name and its `(` start at `pos`, as in `FNf(` or `FNa$(`
fn fn_name_follows(text: &[u8],pos: usize) -> bool {
    if pos >= text.len() || !text[pos].is_ascii_alphabetic() {
        return false;
    }
    let mut k = pos + 1;
    if k < text.len() && text[k]==b'$' {
        k += 1;
    }
    k < text.len() && text[k]==b'('
}

/// Case insensitive match of one keyword, a space in the keyword matches zero or more whitespace.
fn match_keyword(kw: &[u8],text: &[u8],pos: usize) -> Option<usize> {
    let mut j = pos;
    for c in kw {
        if *c==b' ' {
            while j < text.len() && text[j].is_ascii_whitespace() {
                j += 1;
            }
            continue;
        }
        if j >= text.len() || text[j].to_ascii_uppercase() != *c {
            return None;
        }
        j += 1;
    }
    Some(j)
}

/// Listing form of a token: the keyword with its customary spacing.
/// `prev` is the text already listed for this line.
pub fn listing_form(keyword: &str,prev: &str) -> String {
    let mut ans = String::new();
    if LEADING_SPACE.contains(&keyword) && prev.len() > 0 && !prev.ends_with(' ') && !prev.ends_with(':') {
        ans += " ";
    }
    ans += keyword;
    if let Some(last) = keyword.chars().last() {
        if last.is_ascii_alphanumeric() || last=='$' {
            ans += " ";
        }
    }
    ans
}
