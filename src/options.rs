//! Command line interface definitions.

use structopt::StructOpt;

#[derive(Clone, StructOpt)]
#[structopt(
    name = "spncrack",
    about = "A toy 16-bit SPN cipher and a linear cryptanalysis attack against it."
)]
pub enum SpncrackOptions {
    #[structopt(name = "lat")]
    /**
    Print the linear approximation table of the cipher's S-box as biases,
    i.e. agreement counts minus 8.
    */
    Lat,

    #[structopt(name = "corpus")]
    /**
    Generate a corpus of known plaintext/ciphertext pairs under one key and
    write it to a CSV file.
    */
    Corpus {
        #[structopt(short = "n", long = "samples", default_value = "10000")]
        /**
        The number of plaintext/ciphertext pairs to generate.
        */
        samples: usize,

        #[structopt(short = "s", long = "seed")]
        /**
        Hex-encoded key seed of at least 16 bytes. A fresh seed is drawn from
        the operating system if omitted.
        */
        seed: Option<String>,

        #[structopt(short = "o", long = "output")]
        /**
        Path of the corpus file to write.
        */
        output: String,
    },

    #[structopt(name = "attack")]
    /**
    Run the partial-subkey recovery attack. A random key is generated, a
    corpus is sampled under it, and the recovered candidate is checked
    against the true last-round subkey.
    */
    Attack {
        #[structopt(short = "n", long = "samples", default_value = "10000")]
        /**
        The number of plaintext/ciphertext pairs to sample.
        */
        samples: usize,

        #[structopt(short = "c", long = "corpus")]
        /**
        Path of a corpus file to attack instead of sampling one. The true key
        is unknown in this mode, so only the recovered candidate is reported.
        */
        corpus: Option<String>,
    },
}
