use approx::assert_abs_diff_eq;
use transcript_index::{CoarseLine, Interval, TranscriptionIndex, UNKNOWN_EPISODE_LENGTH};

const TOLERANCE: f64 = 1e-6;

fn sixteen_words() -> anyhow::Result<TranscriptionIndex> {
    let content = "0:00
        0 1 2 3

        0:04
        4 5 6 7

        0:08
        8 9 10 11

        0:12
        12 13 14 15
        ";

    let mut index = TranscriptionIndex::new();
    index.add_transcript("episode_1", content, 16.0)?;
    Ok(index)
}

#[test]
fn add_builds_line_and_word_intervals() -> anyhow::Result<()> {
    let mut index = TranscriptionIndex::new();
    let content = "0:01
    a b c

    0:04
    d e f
    ";
    index.add_transcript("an identifier", content, 7.0)?;

    assert_eq!(index.len(), 1);
    let episode = index.episode("an identifier").expect("episode was indexed");
    assert_eq!(episode.id(), "an identifier");

    let expected = [
        ("a b c", 1.0, 4.0, [("a", 1.0, 2.0), ("b", 2.0, 3.0), ("c", 3.0, 4.0)]),
        ("d e f", 4.0, 7.0, [("d", 4.0, 5.0), ("e", 5.0, 6.0), ("f", 6.0, 7.0)]),
    ];
    assert_eq!(episode.lines().len(), expected.len());

    for (line, (text, start, end, words)) in episode.lines().iter().zip(expected) {
        assert_eq!(line.text(), text);
        assert_abs_diff_eq!(line.start(), start, epsilon = TOLERANCE);
        assert_abs_diff_eq!(line.end(), end, epsilon = TOLERANCE);

        assert_eq!(line.words().len(), words.len());
        for (word, (word_text, word_start, word_end)) in line.words().iter().zip(words) {
            assert_eq!(word.text, word_text);
            assert_abs_diff_eq!(word.start(), word_start, epsilon = TOLERANCE);
            assert_abs_diff_eq!(word.end(), word_end, epsilon = TOLERANCE);
        }
    }
    Ok(())
}

#[test]
fn search_returns_each_full_line_span() -> anyhow::Result<()> {
    let mut index = TranscriptionIndex::new();
    index.add_transcript("id", "0:01\n a b c\n\n0:04\n d e f\n", 7.0)?;

    assert_eq!(index.search("id", 1.0, 4.0), "a b c");
    assert_eq!(index.search("id", 4.0, 7.0), "d e f");
    Ok(())
}

#[test]
fn search_resolves_word_ranges_across_lines() -> anyhow::Result<()> {
    let index = sixteen_words()?;

    assert_eq!(index.search("episode_1", 0.0, 1.0), "0");
    assert_eq!(index.search("episode_1", 1.0, 3.0), "1 2");
    assert_eq!(index.search("episode_1", 3.0, 5.0), "3 4");
    assert_eq!(index.search("episode_1", 3.0, 8.0), "3 4 5 6 7");
    assert_eq!(
        index.search("episode_1", 2.0, 13.0),
        "2 3 4 5 6 7 8 9 10 11 12"
    );
    assert_eq!(index.search("episode_1", 6.0, 9.0), "6 7 8");
    Ok(())
}

#[test]
fn full_range_returns_every_word_in_order() -> anyhow::Result<()> {
    let index = sixteen_words()?;
    let all: Vec<String> = (0..16).map(|i| i.to_string()).collect();

    assert_eq!(index.search("episode_1", 0.0, 16.0), all.join(" "));
    Ok(())
}

#[test]
fn queries_outside_indexed_time_are_empty() -> anyhow::Result<()> {
    let index = sixteen_words()?;

    assert_eq!(index.search("episode_1", 16.5, 20.0), "");
    assert_eq!(index.search("episode_1", -5.0, -1.0), "");
    assert_eq!(index.search("episode_1", 9.0, 6.0), "");
    Ok(())
}

#[test]
fn reversed_range_within_a_single_word_is_empty() -> anyhow::Result<()> {
    let mut index = TranscriptionIndex::new();
    index.add_transcript("id", "0:01\n a b c\n\n0:04\n d e f\n", 7.0)?;

    assert_eq!(index.search("id", 1.8, 1.2), "");
    assert_eq!(index.search("id", 5.9, 5.1), "");
    assert_eq!(index.search("id", 1.2, 1.8), "a");
    assert_eq!(index.search("id", 5.1, 5.9), "e");
    Ok(())
}

#[test]
fn zero_width_and_unknown_episode_queries_are_empty() -> anyhow::Result<()> {
    let index = sixteen_words()?;

    for t in [0.0, 3.5, 4.0, 8.0, 16.0] {
        assert_eq!(index.search("episode_1", t, t), "");
    }
    assert_eq!(index.search("episode_2", 0.0, 16.0), "");
    Ok(())
}

#[test]
fn search_words_exposes_word_intervals() -> anyhow::Result<()> {
    let index = sixteen_words()?;

    let words = index.search_words("episode_1", 3.0, 5.0);
    let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["3", "4"]);
    assert_abs_diff_eq!(words[0].start(), 3.0, epsilon = TOLERANCE);
    assert_abs_diff_eq!(words[1].end(), 5.0, epsilon = TOLERANCE);
    Ok(())
}

#[test]
fn words_are_rounded_up_to_whole_tokens() -> anyhow::Result<()> {
    // 11 words over 4 seconds: the first 2 seconds cover 5.5 words, so 6 are returned.
    let mut index = TranscriptionIndex::new();
    let content = "7:56\nbefore\n\n8:00\nwhen the honeycrisp finally get to the store, they do great\n\n8:04\nafter\n";
    index.add_transcript("episode_1", content, 13.0 * 60.0 + 57.0)?;

    assert_eq!(
        index.search("episode_1", 480.0, 482.0),
        "when the honeycrisp finally get to"
    );
    Ok(())
}

#[test]
fn unknown_episode_length_pins_final_words_to_their_start() {
    let mut index = TranscriptionIndex::new();
    index.add(
        "open",
        vec![
            CoarseLine::new(0.0, 10.0, "intro words"),
            CoarseLine::new(10.0, UNKNOWN_EPISODE_LENGTH, "closing remarks here"),
        ],
        UNKNOWN_EPISODE_LENGTH,
    );

    assert_eq!(index.search("open", 9.0, 11.0), "words closing remarks here");
    assert_eq!(index.search("open", 10.5, 60.0), "");
}

#[test]
fn episodes_are_independent() -> anyhow::Result<()> {
    let mut index = TranscriptionIndex::new();
    index.add_transcript("one", "0:00\nalpha beta\n", 2.0)?;
    index.add_transcript("two", "0:00\ngamma delta\n", 2.0)?;

    assert_eq!(index.search("one", 0.0, 2.0), "alpha beta");
    assert_eq!(index.search("two", 0.0, 2.0), "gamma delta");

    let mut ids: Vec<&str> = index.episode_ids().collect();
    ids.sort_unstable();
    assert_eq!(ids, ["one", "two"]);
    assert!(index.contains("one"));
    Ok(())
}
