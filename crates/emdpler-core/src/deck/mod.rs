//! Input-deck assembly for the solver.
//!
//! The deck is a fixed seven-section text file. The header lines are
//! human-readable documentation carried over from the legacy deck; the
//! solver reads values purely by column position on the lines below each
//! header.

use crate::codec::{
    COMPONENT_FLAG, FREQUENCY, GEOMETRY, LAYER_COUNT, LAYER_VALUE, RECEIVER_OFFSET,
    SOURCE_STRENGTH, encode, encode_all, encode_int, wrap,
};
use crate::domain::{EmdplerError, EmdplerResult, SoundingRequest};
use std::collections::BTreeMap;

/// Deck file name the solver expects in its working directory.
pub const INPUT_FILE_NAME: &str = "Input.in";

/// Result files the solver writes next to the deck, in order:
/// frequency response, induction-number response, normalized response.
pub const RESULT_FILE_NAMES: [&str; 3] = ["RESULT1.DAT", "RESULT2.DAT", "RESULT3.DAT"];

/// Columns in every result table: abscissa (frequency or induction
/// number), amplitude, phase.
pub const RESULT_COLUMNS: usize = 3;

pub const INPUT_DECK_TEMPLATE: &str = "\
DIPOLE CHARACTERISTIC PARAMETERS:
IFACT(Without-1/With-2 Displacement Current Factor) Format(I5)
{ifact}
IDIPOL(VMD-1,HMD-2,HED-3)--ICOMP(Hr/Hx-1,Ephai/Hy-2,Hz-3,Ex-4,Ey-5) Format(2I5)
{idipol}{icomp}
R(S-R Offset)--HT(Source Height)--Z(Receiver Level)(Format(3F9.2)
{offset}{height}{level}
FREQ1(Highest Freq.)------FREQL(Lowest Freq) ---Format(2F12.2)
{freq_h}{freq_l}
RI(Current-Ampere)-Area(Dipole Area)-RM(Dipole Moment)-Format(3F9.2)
{current}{area}{moment}
X (X- HMD & HED)--Y (Y- HMD & HED)--(Receiver position w.r.t. Dipole)--Format(2F9.3)
{rec_x}{rec_y}
MODEL PARAMETERS:
NLYR-------Resistivity--and---Thickness----Format(10F8.3)
{nlyr}
{res}{thk}
";

/// Substitute every `{name}` placeholder in `template` from `values`.
/// An unfilled placeholder aborts the assembly before any text leaves this
/// function; there is no partial deck.
pub fn render_template(
    template: &str,
    values: &BTreeMap<&str, String>,
) -> EmdplerResult<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| EmdplerError::MissingField {
            name: after.chars().take(16).collect(),
        })?;
        let name = &after[..close];
        let value = values.get(name).ok_or_else(|| EmdplerError::MissingField {
            name: name.to_string(),
        })?;
        rendered.push_str(value);
        rest = &after[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// Encode every parameter of `request` through the deck format table and
/// render the full input document. Any encoding failure aborts before a
/// single byte is written anywhere.
pub fn assemble_input_deck(request: &SoundingRequest) -> EmdplerResult<String> {
    request.model.validate()?;

    let res_fields = encode_all(&request.model.resistivities, LAYER_VALUE)?;
    let thk_fields = encode_all(&request.model.thicknesses, LAYER_VALUE)?;

    let mut values: BTreeMap<&str, String> = BTreeMap::new();
    values.insert(
        "ifact",
        encode_int(request.displacement_factor(), COMPONENT_FLAG)?,
    );
    values.insert("idipol", encode_int(request.dipole.code(), COMPONENT_FLAG)?);
    values.insert(
        "icomp",
        encode_int(request.component.code(), COMPONENT_FLAG)?,
    );
    values.insert("offset", encode(request.src_rec_offset, GEOMETRY)?);
    values.insert("height", encode(request.src_height, GEOMETRY)?);
    values.insert("level", encode(request.rec_level, GEOMETRY)?);
    values.insert("freq_h", encode(request.freq_high, FREQUENCY)?);
    values.insert("freq_l", encode(request.freq_low, FREQUENCY)?);
    values.insert("current", encode(request.current, SOURCE_STRENGTH)?);
    values.insert("area", encode(request.dipole_area, SOURCE_STRENGTH)?);
    values.insert("moment", encode(request.dipole_moment, SOURCE_STRENGTH)?);
    values.insert("rec_x", encode(request.rec_x, RECEIVER_OFFSET)?);
    values.insert("rec_y", encode(request.rec_y, RECEIVER_OFFSET)?);
    values.insert(
        "nlyr",
        encode_int(request.model.layer_count() as i64, LAYER_COUNT)?,
    );
    // Layer blocks wrap at the record's field count, matching the solver's
    // 10F8.3 read statements.
    let record_width = Some(LAYER_VALUE.record_width());
    values.insert("res", wrap(&res_fields, record_width).join("\n"));
    values.insert("thk", wrap(&thk_fields, record_width).join("\n"));

    render_template(INPUT_DECK_TEMPLATE, &values)
}
