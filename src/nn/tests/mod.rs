mod graph_run;
mod layer_batch_norm;
mod layer_moments;
