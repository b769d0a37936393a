//! Script fragments. Every condition subtype has exactly one template, and
//! each mirrors the matching predicate in `crate::conditions`.

use crate::graph::condition::{
    ABSENCE, COLOR_STREAK, COLUMN_HOT, DOZEN_HOT, MIRROR, PARITY_STREAK, RANGE_STREAK,
    SEQUENCE_CUSTOM, SPECIFIC_NUMBER,
};

/// Outcome normalization, windows and the color table.
pub(super) const PRELUDE: &str = r#"const RED_NUMBERS = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];
const COLOR_NAMES = { vermelho: "vermelho", red: "vermelho", preto: "preto", black: "preto", verde: "verde", green: "verde", zero: "verde" };
const MISS = Object.freeze({ result: false, candidates: [] });

function normalizeOutcome(entry) {
  if (typeof entry === "number") {
    return Number.isInteger(entry) && entry >= 0 && entry <= 36 ? entry : null;
  }
  if (typeof entry === "string") {
    const text = normalizeToken(entry);
    if (text.length === 0) return null;
    if (/^[0-9]+$/.test(text)) {
      const n = parseInt(text, 10);
      return n <= 36 ? n : null;
    }
    return text;
  }
  return null;
}

function normalizeToken(text) {
  return text.replace(/^[ \t\n\r\f]+|[ \t\n\r\f]+$/g, "").replace(/[A-Z]/g, (c) => c.toLowerCase());
}

function normalizeHistory(history) {
  if (!Array.isArray(history)) throw new Error("History must be a JSON array");
  if (history.length === 0) throw new Error("History must contain at least one outcome");
  return history.map((entry, index) => {
    const outcome = normalizeOutcome(entry);
    if (outcome === null) {
      throw new Error("History entry " + index + " is not a valid outcome: " + JSON.stringify(entry));
    }
    return outcome;
  });
}

function windowOf(rounds, n) {
  return rounds.slice(rounds.length - Math.min(n, rounds.length));
}

function colorOf(outcome) {
  if (typeof outcome === "number") {
    if (outcome === 0) return "verde";
    return RED_NUMBERS.includes(outcome) ? "vermelho" : "preto";
  }
  return Object.prototype.hasOwnProperty.call(COLOR_NAMES, outcome) ? COLOR_NAMES[outcome] : null;
}

function colorNumbers(color) {
  const out = [];
  for (let n = 0; n <= 36; n++) {
    if (colorOf(n) === color) out.push(n);
  }
  return out;
}

function unscored(numbers) {
  return numbers.map((number) => ({ number, confidence: null }));
}

function streak(rounds, length, pred) {
  if (length === null || length === 0 || length > rounds.length) return false;
  return windowOf(rounds, length).every(pred);
}
"#;

/// Shared by `dozen_hot` and `column_hot`.
pub(super) const HOT_GROUPS: &str = r#"function dozenOf(n) {
  return n >= 1 && n <= 36 ? Math.floor((n - 1) / 12) : null;
}

function columnOf(n) {
  if (n < 1 || n > 36) return null;
  const r = n % 3;
  return r === 1 ? 0 : r === 2 ? 1 : 2;
}

function hotGroups(rounds, p, groupOf) {
  if (p.window === null || p.minFrequency === null) return MISS;
  const counts = [0, 0, 0];
  for (const outcome of windowOf(rounds, p.window)) {
    if (typeof outcome !== "number") continue;
    const group = groupOf(outcome);
    if (group !== null) counts[group] += 1;
  }
  const candidates = [];
  counts.forEach((count, group) => {
    if (count < p.minFrequency) return;
    for (let n = 1; n <= 36; n++) {
      if (groupOf(n) === group) candidates.push({ number: n, confidence: count });
    }
  });
  return candidates.length > 0 ? { result: true, candidates } : MISS;
}
"#;

const ABSENCE_JS: &str = r#"function absence(rounds, p) {
  if (p.span === null || p.target === null) return MISS;
  if (p.event === "numero") {
    return windowOf(rounds, p.span).every((o) => o !== p.target)
      ? { result: true, candidates: unscored([p.target]) }
      : MISS;
  }
  if (p.event === "cor") {
    return windowOf(rounds, p.span).every((o) => colorOf(o) !== p.target)
      ? { result: true, candidates: unscored(colorNumbers(p.target)) }
      : MISS;
  }
  return MISS;
}
"#;

const SPECIFIC_NUMBER_JS: &str = r#"function specificNumber(rounds, p) {
  if (p.number === null) return MISS;
  let result = false;
  if (p.mode === "ocorreu") {
    result = rounds.some((o) => o === p.number);
  } else if (p.mode === "ausente") {
    result = p.span !== null && windowOf(rounds, p.span).every((o) => o !== p.number);
  }
  return result ? { result: true, candidates: unscored([p.number]) } : MISS;
}
"#;

const DOZEN_HOT_JS: &str = r#"function dozenHot(rounds, p) {
  return hotGroups(rounds, p, dozenOf);
}
"#;

const COLUMN_HOT_JS: &str = r#"function columnHot(rounds, p) {
  return hotGroups(rounds, p, columnOf);
}
"#;

const MIRROR_JS: &str = r#"function mirror(rounds, p) {
  return rounds.some((o) => typeof o === "number") ? { result: true, candidates: [] } : MISS;
}
"#;

const SEQUENCE_CUSTOM_JS: &str = r#"function sequenceCustom(rounds, p) {
  const seq = p.sequence;
  if (seq === null || p.mode === null) return MISS;
  if (seq.length === 0 || seq.length > rounds.length) return MISS;
  const matchesAt = (start) => seq.every((token, i) => rounds[start + i] === token);
  let result = false;
  if (p.mode === "exato") {
    result = matchesAt(rounds.length - seq.length);
  } else {
    for (let start = 0; start + seq.length <= rounds.length && !result; start++) {
      result = matchesAt(start);
    }
  }
  return result ? { result: true, candidates: [] } : MISS;
}
"#;

const COLOR_STREAK_JS: &str = r#"function colorStreak(rounds, p) {
  if (p.color === null) return MISS;
  return streak(rounds, p.length, (o) => colorOf(o) === p.color) ? { result: true, candidates: [] } : MISS;
}
"#;

const PARITY_STREAK_JS: &str = r#"function parityStreak(rounds, p) {
  if (p.parity === null) return MISS;
  const even = p.parity === "par";
  const pred = (o) => typeof o === "number" && o > 0 && (o % 2 === 0) === even;
  return streak(rounds, p.length, pred) ? { result: true, candidates: [] } : MISS;
}
"#;

const RANGE_STREAK_JS: &str = r#"function rangeStreak(rounds, p) {
  if (p.half === null) return MISS;
  const [lo, hi] = p.half === "baixo" ? [1, 18] : [19, 36];
  const pred = (o) => typeof o === "number" && o >= lo && o <= hi;
  return streak(rounds, p.length, pred) ? { result: true, candidates: [] } : MISS;
}
"#;

/// Merging, gating and `runStrategy`, which the exported entry point wraps.
pub(super) const RUNTIME: &str = r#"function maxConfidence(a, b) {
  if (a === null) return b;
  if (b === null) return a;
  return Math.max(a, b);
}

function merge(candidates) {
  const out = [];
  for (const c of candidates) {
    const found = out.find((m) => m.number === c.number);
    if (found) {
      found.confidence = maxConfidence(found.confidence, c.confidence);
    } else {
      out.push({ number: c.number, confidence: c.confidence });
    }
  }
  return out;
}

function evalWiring(w, effective) {
  switch (w.op) {
    case "node": return effective.get(w.id) === true;
    case "all": return w.items.every((item) => evalWiring(item, effective));
    case "any": return w.items.some((item) => evalWiring(item, effective));
    default: return w.value;
  }
}

function formatWiring(w, effective) {
  switch (w.op) {
    case "node": return w.id + "=" + String(effective.get(w.id) === true);
    case "all": return formatGroup(w.items, " AND ", effective);
    case "any": return formatGroup(w.items, " OR ", effective);
    default: return String(w.value);
  }
}

function formatGroup(items, separator, effective) {
  return items
    .map((item) => (item.op === "all" || item.op === "any" ? "(" + formatWiring(item, effective) + ")" : formatWiring(item, effective)))
    .join(separator);
}

function gatingRecord(candidateCount, zeroRemoved, truncated, skipped, manual) {
  return {
    mode: GATING.mode,
    limit: GATING.limit,
    excludeZero: GATING.excludeZero,
    manualNumbers: manual,
    candidateCount,
    zeroRemoved,
    truncated,
    skipped,
  };
}

function applyGating(candidates) {
  let pool = merge(candidates);
  const candidateCount = pool.length;
  let zeroRemoved = false;
  if (GATING.excludeZero) {
    const before = pool.length;
    pool = pool.filter((c) => c.number !== 0);
    zeroRemoved = pool.length !== before;
  }
  if (GATING.truncation === "confidence_first") {
    const rank = (c) => (c.confidence === null ? -1 : c.confidence);
    pool.sort((a, b) => rank(b) - rank(a));
  }
  const limit = GATING.limit;
  if (GATING.mode === "automatic") {
    const numbers = pool.slice(0, limit).map((c) => c.number);
    return { numbers, applied: gatingRecord(candidateCount, zeroRemoved, pool.length > limit, false, []) };
  }
  const manual = [];
  for (const n of GATING.manualNumbers) {
    if (GATING.excludeZero && n === 0) {
      zeroRemoved = true;
      continue;
    }
    if (!manual.includes(n)) manual.push(n);
  }
  const fill = pool.map((c) => c.number).filter((n) => !manual.includes(n));
  const numbers = manual.concat(fill).slice(0, limit);
  const truncated = manual.length + fill.length > limit;
  return { numbers, applied: gatingRecord(candidateCount, zeroRemoved, truncated, false, manual) };
}

function runStrategy(history) {
  const rounds = normalizeHistory(history);
  const assessments = new Map();
  const effective = new Map();
  const decisionTrace = [];

  for (const step of STEPS) {
    const assessment = step.run(rounds);
    const upstream = step.gate === null ? true : evalWiring(step.gate, effective);
    const entry = { nodeId: step.id, subtype: step.subtype, result: assessment.result };
    if (assessment.result && assessment.candidates.length > 0) {
      entry.contributedNumbers = assessment.candidates.map((c) => c.number);
    }
    decisionTrace.push(entry);
    effective.set(step.id, assessment.result && upstream);
    assessments.set(step.id, assessment);
  }

  const logicTrace = [];
  const resolved = ACTIONS.map((action) => {
    const triggered = evalWiring(action.wiring, effective);
    const pool = merge(
      action.contributors
        .map((id) => assessments.get(id))
        .filter((a) => a !== undefined && a.result)
        .flatMap((a) => a.candidates),
    );
    logicTrace.push(action.id + " <= " + formatWiring(action.wiring, effective) + " => " + String(triggered));
    return { action, triggered, pool };
  });

  const fired = resolved.filter((r) => r.triggered);
  let gated;
  if (fired.length > 0) {
    gated = applyGating(fired.flatMap((r) => r.pool));
  } else {
    gated = { numbers: [], applied: gatingRecord(0, false, false, true, []) };
  }
  logicTrace.push(
    "gating " + GATING.mode + ": " + gated.applied.candidateCount + " candidate(s) -> " + gated.numbers.length + " number(s)",
  );
  if (fired.length > 0 && gated.numbers.length === 0) {
    logicTrace.push("signal suppressed: no numbers after gating");
  }

  return {
    trigger: fired.length > 0 && gated.numbers.length > 0,
    numbers: gated.numbers,
    logicTrace,
    graphWiring: {
      evaluationOrder: STEPS.map((s) => s.id),
      actions: resolved.map((r) => ({
        actionId: r.action.id,
        combinator: r.action.combinator,
        inputs: r.action.inputs,
        triggered: r.triggered,
        candidateNumbers: r.pool.map((c) => c.number),
      })),
    },
    gatingApplied: gated.applied,
    decisionTrace,
  };
}
"#;

/// The template for a subtype and the name of the function it defines.
pub(super) fn template_for(subtype: &str) -> Option<(&'static str, &'static str)> {
    let template = match subtype {
        ABSENCE => ("absence", ABSENCE_JS),
        SPECIFIC_NUMBER => ("specificNumber", SPECIFIC_NUMBER_JS),
        DOZEN_HOT => ("dozenHot", DOZEN_HOT_JS),
        COLUMN_HOT => ("columnHot", COLUMN_HOT_JS),
        MIRROR => ("mirror", MIRROR_JS),
        SEQUENCE_CUSTOM => ("sequenceCustom", SEQUENCE_CUSTOM_JS),
        COLOR_STREAK => ("colorStreak", COLOR_STREAK_JS),
        PARITY_STREAK => ("parityStreak", PARITY_STREAK_JS),
        RANGE_STREAK => ("rangeStreak", RANGE_STREAK_JS),
        _ => return None,
    };
    Some(template)
}

pub(super) fn needs_hot_groups(subtype: &str) -> bool {
    matches!(subtype, DOZEN_HOT | COLUMN_HOT)
}
